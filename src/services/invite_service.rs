// src/services/invite_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::directory::{Account, Role},
    models::tenancy::Membership,
    provider::{IdentityProvider, MembershipStore, ProviderError},
};

/// LÓGICA DE NEGÓCIO: convida a conta no provedor de identidade e grava o
/// vínculo dela com a empresa.
///
/// Não existe transação atravessando o provedor e a tabela de vínculos:
/// são duas operações independentes, com o estado intermediário (conta
/// criada e solta) nomeado em vez de escondido.
#[derive(Clone)]
pub struct InviteService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn MembershipStore>,
    invite_redirect_url: String,
}

impl InviteService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn MembershipStore>,
        invite_redirect_url: String,
    ) -> Self {
        Self {
            identity,
            store,
            invite_redirect_url,
        }
    }

    pub async fn invite(
        &self,
        nome: &str,
        email: &str,
        cargo: Option<Role>,
        empresa_id: Uuid,
    ) -> Result<(Account, Role), AppError> {
        let cargo = cargo.unwrap_or(Role::Colaborador);

        // Passo 1: convite no provedor. Recusa (e-mail já registrado,
        // endereço malformado) volta como está ao cliente; nada foi criado.
        let conta = self
            .identity
            .invite_by_email(email, nome, &self.invite_redirect_url)
            .await
            .map_err(|e| match e {
                ProviderError::Rejected(msg) => AppError::ProviderRejected(msg),
                outro => AppError::Provider(outro),
            })?;

        // Passo 2: exatamente um vínculo na tabela usuarios_empresas. Se
        // falhar, a conta já existe no provedor; o erro carrega o id dela
        // para o elo ser refeito sem repetir o convite (o convite repetido
        // seria recusado no passo 1).
        let vinculo = Membership {
            usuario_id: conta.id,
            empresa_id,
            cargo,
            ativo: true,
        };
        if let Err(e) = self.store.insert_membership(&vinculo).await {
            tracing::error!("⚠️ Usuário {} criado, mas erro ao vincular: {}", conta.id, e);
            return Err(AppError::PartialLink {
                usuario_id: conta.id,
            });
        }

        tracing::info!("✅ Convite enviado para {}", email);
        Ok((conta, cargo))
    }
}
