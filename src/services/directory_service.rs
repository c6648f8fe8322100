// src/services/directory_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{collate, error::AppError},
    models::directory::{Account, CompanyGroup, Role, UserListing, VisibleUser, UNKNOWN},
    models::tenancy::{CompanyRef, Membership},
    provider::{IdentityProvider, MembershipStore},
};

/// LÓGICA DE NEGÓCIO: mescla o diretório do provedor de identidade com os
/// vínculos usuário-empresa e os nomes de empresa, respeitando o recorte
/// de visibilidade por cargo.
#[derive(Clone)]
pub struct DirectoryService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn MembershipStore>,
}

impl DirectoryService {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn MembershipStore>) -> Self {
        Self { identity, store }
    }

    /// Lista os usuários visíveis para o solicitante. Admin recebe o
    /// diretório inteiro agrupado por empresa; gestor/colaborador recebem
    /// apenas os colegas da própria empresa, em lista plana.
    ///
    /// Qualquer falha de provedor aborta a listagem inteira: nunca saem
    /// resultados parciais.
    pub async fn list_visible_users(
        &self,
        solicitante: Option<Role>,
        empresa_id: Uuid,
        search: Option<&str>,
    ) -> Result<UserListing, AppError> {
        let admin = solicitante == Some(Role::Admin);

        // 1) Contas do diretório de identidade
        let contas = self.identity.list_accounts().await?;

        // 2) Vínculos ativos. Para não-admin o recorte por empresa vai no
        //    filtro da consulta: fronteira de autorização, não otimização.
        let escopo = if admin { None } else { Some(empresa_id) };
        let vinculos = self.store.active_memberships(escopo).await?;

        // 3) Nomes apenas das empresas referenciadas pelos vínculos
        let mut ids: Vec<Uuid> = vinculos.iter().map(|v| v.empresa_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let empresas = if ids.is_empty() {
            Vec::new()
        } else {
            self.store.companies_by_ids(&ids).await?
        };

        // 4) Mescla e filtros
        let mut usuarios = montar_usuarios(contas, &vinculos, &empresas, admin);
        if let Some(termo) = termo_de_busca(search) {
            usuarios.retain(|u| corresponde(u, &termo, admin));
        }

        Ok(if admin {
            UserListing::Grouped(agrupar_por_empresa(usuarios))
        } else {
            UserListing::Flat(usuarios)
        })
    }
}

/// Mescla diretório + vínculos + nomes de empresa. Nas visões com recorte
/// de empresa, conta sem vínculo (dentro do recorte) fica de fora; para
/// admin todas as contas aparecem.
fn montar_usuarios(
    contas: Vec<Account>,
    vinculos: &[Membership],
    empresas: &[CompanyRef],
    incluir_sem_vinculo: bool,
) -> Vec<VisibleUser> {
    // Primeiro vínculo por conta, como o painel sempre resolveu.
    let mut vinculo_por_usuario: HashMap<Uuid, &Membership> = HashMap::new();
    for v in vinculos {
        vinculo_por_usuario.entry(v.usuario_id).or_insert(v);
    }
    let nome_empresa: HashMap<Uuid, &str> =
        empresas.iter().map(|e| (e.id, e.nome.as_str())).collect();

    contas
        .into_iter()
        .filter_map(|conta| {
            let vinculo = vinculo_por_usuario.get(&conta.id).copied();
            if vinculo.is_none() && !incluir_sem_vinculo {
                return None;
            }

            // Cargo: vínculo → metadado da conta → sentinela
            let cargo = vinculo
                .map(|v| v.cargo)
                .or(conta.cargo_hint)
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| UNKNOWN.to_string());

            let empresa_id = vinculo.map(|v| v.empresa_id);
            let empresa_nome = empresa_id
                .and_then(|id| nome_empresa.get(&id).copied())
                .unwrap_or(UNKNOWN)
                .to_string();

            Some(VisibleUser {
                id: conta.id,
                email: conta.email.unwrap_or_else(|| UNKNOWN.to_string()),
                nome: conta.nome,
                cargo,
                empresa_id,
                empresa_nome,
                created_at: conta.created_at,
            })
        })
        .collect()
}

/// Termo de busca normalizado; em branco equivale a "sem busca".
fn termo_de_busca(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn corresponde(u: &VisibleUser, termo: &str, com_empresa: bool) -> bool {
    u.email.to_lowercase().contains(termo)
        || u.nome.to_lowercase().contains(termo)
        || (com_empresa && u.empresa_nome.to_lowercase().contains(termo))
}

/// Agrupa por empresa preservando a ordem de chegada dentro de cada grupo
/// e ordenando os grupos pelo nome com comparação pt-BR. Contas sem
/// empresa caem no grupo "Sem empresa".
fn agrupar_por_empresa(usuarios: Vec<VisibleUser>) -> Vec<CompanyGroup> {
    let mut grupos: Vec<CompanyGroup> = Vec::new();
    for usuario in usuarios {
        match grupos
            .iter_mut()
            .find(|g| g.empresa_id == usuario.empresa_id)
        {
            Some(grupo) => grupo.usuarios.push(usuario),
            None => {
                let empresa_nome = if usuario.empresa_id.is_none() {
                    "Sem empresa".to_string()
                } else {
                    usuario.empresa_nome.clone()
                };
                grupos.push(CompanyGroup {
                    empresa_id: usuario.empresa_id,
                    empresa_nome,
                    usuarios: vec![usuario],
                });
            }
        }
    }
    grupos.sort_by(|a, b| collate::compare_ptbr(&a.empresa_nome, &b.empresa_nome));
    grupos
}
