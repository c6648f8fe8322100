// src/services/account_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    models::directory::{Account, Role},
    models::tenancy::Company,
    provider::{IdentityProvider, MembershipStore, ProviderError},
};

/// "Quem está falando": conta + cargo + empresa resolvidos a partir do
/// token de sessão. É o que o painel carrega em toda tela privada.
#[derive(Debug, Clone)]
pub struct AccountContext {
    pub conta: Account,
    pub cargo: Option<Role>,
    pub empresa: Option<Company>,
}

/// LÓGICA DE NEGÓCIO: resolução de contexto da sessão e repasse das
/// operações de perfil ao provedor de identidade.
#[derive(Clone)]
pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn MembershipStore>,
}

impl AccountService {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn MembershipStore>) -> Self {
        Self { identity, store }
    }

    /// Conta dona do token → vínculo ativo → empresa. Sem vínculo ativo,
    /// cargo e empresa ficam vazios (a conta pode ter sido convidada e
    /// nunca vinculada).
    pub async fn context_from_token(&self, access_token: &str) -> Result<AccountContext, AppError> {
        let conta = self
            .identity
            .account_from_token(access_token)
            .await
            .map_err(sessao_para_erro)?;

        let vinculo = self.store.active_membership_for(conta.id).await?;
        let empresa = match &vinculo {
            Some(v) => self.store.company_by_id(v.empresa_id).await?,
            None => None,
        };

        Ok(AccountContext {
            conta,
            cargo: vinculo.map(|v| v.cargo),
            empresa,
        })
    }

    /// Atualiza nome/e-mail no provedor. O e-mail só é enviado quando
    /// realmente muda, como o painel sempre fez.
    pub async fn update_profile(
        &self,
        access_token: &str,
        nome: Option<&str>,
        email: Option<&str>,
    ) -> Result<Account, AppError> {
        let atual = self
            .identity
            .account_from_token(access_token)
            .await
            .map_err(sessao_para_erro)?;

        let email_novo = email.filter(|e| atual.email.as_deref() != Some(*e));
        if nome.is_none() && email_novo.is_none() {
            return Ok(atual);
        }

        self.identity
            .update_profile(access_token, nome, email_novo)
            .await
            .map_err(sessao_para_erro)
    }

    /// Troca de senha em dois passos: confere a senha atual com o provedor
    /// e só então grava a nova.
    pub async fn change_password(
        &self,
        access_token: &str,
        senha_atual: &str,
        senha_nova: &str,
    ) -> Result<(), AppError> {
        let conta = self
            .identity
            .account_from_token(access_token)
            .await
            .map_err(sessao_para_erro)?;
        let email = conta
            .email
            .ok_or_else(|| AppError::ProviderRejected("Usuário sem e-mail válido.".to_string()))?;

        if !self.identity.verify_password(&email, senha_atual).await? {
            return Err(AppError::WrongCurrentPassword);
        }

        self.identity
            .update_password(access_token, senha_nova)
            .await
            .map_err(sessao_para_erro)
    }
}

fn sessao_para_erro(e: ProviderError) -> AppError {
    match e {
        ProviderError::Unauthorized => AppError::InvalidToken,
        ProviderError::Rejected(msg) => AppError::ProviderRejected(msg),
        outro => AppError::Provider(outro),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::models::tenancy::{CompanyChanges, CompanyRef, Membership};

    struct FakeIdentity {
        conta: Account,
        senha: String,
        trocas_de_senha: Mutex<Vec<String>>,
        perfis: Mutex<Vec<(Option<String>, Option<String>)>>,
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn list_accounts(&self) -> Result<Vec<Account>, ProviderError> {
            Ok(Vec::new())
        }

        async fn invite_by_email(
            &self,
            _e: &str,
            _n: &str,
            _r: &str,
        ) -> Result<Account, ProviderError> {
            unreachable!()
        }

        async fn account_from_token(&self, access_token: &str) -> Result<Account, ProviderError> {
            if access_token == "tok-valido" {
                Ok(self.conta.clone())
            } else {
                Err(ProviderError::Unauthorized)
            }
        }

        async fn update_profile(
            &self,
            _t: &str,
            nome: Option<&str>,
            email: Option<&str>,
        ) -> Result<Account, ProviderError> {
            self.perfis
                .lock()
                .unwrap()
                .push((nome.map(str::to_string), email.map(str::to_string)));
            let mut conta = self.conta.clone();
            if let Some(nome) = nome {
                conta.nome = nome.to_string();
            }
            if let Some(email) = email {
                conta.email = Some(email.to_string());
            }
            Ok(conta)
        }

        async fn update_password(&self, _t: &str, nova: &str) -> Result<(), ProviderError> {
            self.trocas_de_senha.lock().unwrap().push(nova.to_string());
            Ok(())
        }

        async fn verify_password(&self, _email: &str, senha: &str) -> Result<bool, ProviderError> {
            Ok(senha == self.senha)
        }
    }

    struct FakeStore {
        vinculo: Option<Membership>,
        empresa: Option<Company>,
    }

    #[async_trait]
    impl MembershipStore for FakeStore {
        async fn active_memberships(
            &self,
            _e: Option<Uuid>,
        ) -> Result<Vec<Membership>, ProviderError> {
            Ok(Vec::new())
        }

        async fn active_membership_for(
            &self,
            _usuario_id: Uuid,
        ) -> Result<Option<Membership>, ProviderError> {
            Ok(self.vinculo.clone())
        }

        async fn insert_membership(&self, _v: &Membership) -> Result<(), ProviderError> {
            unreachable!()
        }

        async fn companies_by_ids(&self, _ids: &[Uuid]) -> Result<Vec<CompanyRef>, ProviderError> {
            Ok(Vec::new())
        }

        async fn company_by_id(&self, _id: Uuid) -> Result<Option<Company>, ProviderError> {
            Ok(self.empresa.clone())
        }

        async fn update_company(
            &self,
            _id: Uuid,
            _c: &CompanyChanges,
        ) -> Result<Option<Company>, ProviderError> {
            unreachable!()
        }

        async fn set_company_logo(&self, _id: Uuid, _u: &str) -> Result<(), ProviderError> {
            unreachable!()
        }
    }

    fn conta() -> Account {
        Account {
            id: Uuid::from_u128(1),
            email: Some("ana@x.com".to_string()),
            nome: "Ana".to_string(),
            cargo_hint: None,
            created_at: None,
        }
    }

    fn empresa() -> Company {
        Company {
            id: Uuid::from_u128(10),
            nome: "Alfa".to_string(),
            cnpj: Some("00.000.000/0001-00".to_string()),
            dominio: None,
            logo_url: None,
            telefone: None,
        }
    }

    fn servico(vinculo: Option<Membership>, empresa: Option<Company>) -> (AccountService, Arc<FakeIdentity>) {
        let identity = Arc::new(FakeIdentity {
            conta: conta(),
            senha: "senha-atual".to_string(),
            trocas_de_senha: Mutex::new(Vec::new()),
            perfis: Mutex::new(Vec::new()),
        });
        let store = Arc::new(FakeStore { vinculo, empresa });
        (AccountService::new(identity.clone(), store), identity)
    }

    #[tokio::test]
    async fn contexto_resolve_conta_cargo_e_empresa() {
        let vinculo = Membership {
            usuario_id: Uuid::from_u128(1),
            empresa_id: Uuid::from_u128(10),
            cargo: Role::Gestor,
            ativo: true,
        };
        let (svc, _) = servico(Some(vinculo), Some(empresa()));

        let ctx = svc.context_from_token("tok-valido").await.unwrap();
        assert_eq!(ctx.conta.nome, "Ana");
        assert_eq!(ctx.cargo, Some(Role::Gestor));
        assert_eq!(ctx.empresa.unwrap().nome, "Alfa");
    }

    #[tokio::test]
    async fn contexto_sem_vinculo_fica_sem_cargo_e_sem_empresa() {
        let (svc, _) = servico(None, None);

        let ctx = svc.context_from_token("tok-valido").await.unwrap();
        assert_eq!(ctx.cargo, None);
        assert!(ctx.empresa.is_none());
    }

    #[tokio::test]
    async fn token_recusado_vira_invalid_token() {
        let (svc, _) = servico(None, None);
        let erro = svc.context_from_token("tok-errado").await.unwrap_err();
        assert!(matches!(erro, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn email_igual_ao_atual_nao_e_reenviado() {
        let (svc, identity) = servico(None, None);

        svc.update_profile("tok-valido", Some("Ana Maria"), Some("ana@x.com"))
            .await
            .unwrap();

        let perfis = identity.perfis.lock().unwrap();
        assert_eq!(perfis.len(), 1);
        assert_eq!(perfis[0].0.as_deref(), Some("Ana Maria"));
        assert_eq!(perfis[0].1, None);
    }

    #[tokio::test]
    async fn senha_atual_errada_bloqueia_a_troca() {
        let (svc, identity) = servico(None, None);

        let erro = svc
            .change_password("tok-valido", "senha-errada", "senha-nova-123")
            .await
            .unwrap_err();

        assert!(matches!(erro, AppError::WrongCurrentPassword));
        assert!(identity.trocas_de_senha.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn senha_atual_correta_permite_a_troca() {
        let (svc, identity) = servico(None, None);

        svc.change_password("tok-valido", "senha-atual", "senha-nova-123")
            .await
            .unwrap();

        assert_eq!(
            *identity.trocas_de_senha.lock().unwrap(),
            vec!["senha-nova-123".to_string()]
        );
    }
}
