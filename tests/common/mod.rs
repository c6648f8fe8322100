// Substituto em memória da plataforma gerenciada, usado pelos testes de
// integração. Implementa os três provedores e conta cada chamada — as
// propriedades "nenhuma chamada ao provedor acontece" dependem disso.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use uuid::Uuid;

use painel_api::models::directory::{Account, Role};
use painel_api::models::tenancy::{Company, CompanyChanges, CompanyRef, Membership};
use painel_api::provider::{IdentityProvider, LogoStore, MembershipStore, ProviderError};
use painel_api::AppState;

#[derive(Default)]
pub struct FakePlatform {
    pub accounts: Mutex<Vec<Account>>,
    pub memberships: Mutex<Vec<Membership>>,
    pub companies: Mutex<Vec<Company>>,
    /// token de sessão → id da conta
    pub sessions: Mutex<HashMap<String, Uuid>>,

    /// Total de chamadas recebidas, em qualquer provedor.
    pub provider_calls: AtomicUsize,
    pub company_updates: AtomicUsize,

    pub reject_invite_with: Mutex<Option<String>>,
    pub fail_membership_insert: AtomicBool,

    pub uploaded_paths: Mutex<Vec<String>>,
}

/// AppState real, só com os provedores trocados pelo substituto.
pub fn state(platform: &Arc<FakePlatform>) -> AppState {
    AppState::from_parts(
        platform.clone(),
        platform.clone(),
        platform.clone(),
        "http://localhost:5173/criar-senha".to_string(),
    )
}

impl FakePlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_account(&self, id: Uuid, email: &str, nome: &str) {
        self.accounts.lock().unwrap().push(Account {
            id,
            email: Some(email.to_string()),
            nome: nome.to_string(),
            cargo_hint: None,
            created_at: None,
        });
    }

    pub fn add_company(&self, id: Uuid, nome: &str) {
        self.companies.lock().unwrap().push(Company {
            id,
            nome: nome.to_string(),
            cnpj: None,
            dominio: None,
            logo_url: None,
            telefone: None,
        });
    }

    pub fn add_membership(&self, usuario_id: Uuid, empresa_id: Uuid, cargo: Role) {
        self.memberships.lock().unwrap().push(Membership {
            usuario_id,
            empresa_id,
            cargo,
            ativo: true,
        });
    }

    pub fn add_session(&self, token: &str, usuario_id: Uuid) {
        self.sessions
            .lock()
            .unwrap()
            .insert(token.to_string(), usuario_id);
    }

    pub fn calls(&self) -> usize {
        self.provider_calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.provider_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityProvider for FakePlatform {
    async fn list_accounts(&self) -> Result<Vec<Account>, ProviderError> {
        self.tick();
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn invite_by_email(
        &self,
        email: &str,
        nome: &str,
        _redirect_to: &str,
    ) -> Result<Account, ProviderError> {
        self.tick();
        if let Some(msg) = self.reject_invite_with.lock().unwrap().clone() {
            return Err(ProviderError::Rejected(msg));
        }
        let conta = Account {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            nome: nome.to_string(),
            cargo_hint: None,
            created_at: None,
        };
        self.accounts.lock().unwrap().push(conta.clone());
        Ok(conta)
    }

    async fn account_from_token(&self, access_token: &str) -> Result<Account, ProviderError> {
        self.tick();
        let id = self
            .sessions
            .lock()
            .unwrap()
            .get(access_token)
            .copied()
            .ok_or(ProviderError::Unauthorized)?;
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ProviderError::Unauthorized)
    }

    async fn update_profile(
        &self,
        access_token: &str,
        nome: Option<&str>,
        email: Option<&str>,
    ) -> Result<Account, ProviderError> {
        let conta = self.account_from_token(access_token).await?;
        let mut contas = self.accounts.lock().unwrap();
        let alvo = contas
            .iter_mut()
            .find(|c| c.id == conta.id)
            .ok_or(ProviderError::Unauthorized)?;
        if let Some(nome) = nome {
            alvo.nome = nome.to_string();
        }
        if let Some(email) = email {
            alvo.email = Some(email.to_string());
        }
        Ok(alvo.clone())
    }

    async fn update_password(
        &self,
        _access_token: &str,
        _nova_senha: &str,
    ) -> Result<(), ProviderError> {
        self.tick();
        Ok(())
    }

    async fn verify_password(&self, _email: &str, _senha: &str) -> Result<bool, ProviderError> {
        self.tick();
        Ok(true)
    }
}

#[async_trait]
impl MembershipStore for FakePlatform {
    async fn active_memberships(
        &self,
        empresa_id: Option<Uuid>,
    ) -> Result<Vec<Membership>, ProviderError> {
        self.tick();
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.ativo && empresa_id.is_none_or(|e| v.empresa_id == e))
            .cloned()
            .collect())
    }

    async fn active_membership_for(
        &self,
        usuario_id: Uuid,
    ) -> Result<Option<Membership>, ProviderError> {
        self.tick();
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.ativo && v.usuario_id == usuario_id)
            .cloned())
    }

    async fn insert_membership(&self, vinculo: &Membership) -> Result<(), ProviderError> {
        self.tick();
        if self.fail_membership_insert.load(Ordering::SeqCst) {
            return Err(ProviderError::Unexpected {
                status: 500,
                message: "insert falhou".to_string(),
            });
        }
        self.memberships.lock().unwrap().push(vinculo.clone());
        Ok(())
    }

    async fn companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CompanyRef>, ProviderError> {
        self.tick();
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .filter(|e| ids.contains(&e.id))
            .map(|e| CompanyRef {
                id: e.id,
                nome: e.nome.clone(),
            })
            .collect())
    }

    async fn company_by_id(&self, id: Uuid) -> Result<Option<Company>, ProviderError> {
        self.tick();
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn update_company(
        &self,
        id: Uuid,
        changes: &CompanyChanges,
    ) -> Result<Option<Company>, ProviderError> {
        self.tick();
        self.company_updates.fetch_add(1, Ordering::SeqCst);
        let mut empresas = self.companies.lock().unwrap();
        let Some(alvo) = empresas.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(nome) = &changes.nome {
            alvo.nome = nome.clone();
        }
        if let Some(cnpj) = &changes.cnpj {
            alvo.cnpj = Some(cnpj.clone());
        }
        if let Some(dominio) = &changes.dominio {
            alvo.dominio = Some(dominio.clone());
        }
        if let Some(telefone) = &changes.telefone {
            alvo.telefone = Some(telefone.clone());
        }
        Ok(Some(alvo.clone()))
    }

    async fn set_company_logo(&self, id: Uuid, logo_url: &str) -> Result<(), ProviderError> {
        self.tick();
        if let Some(alvo) = self.companies.lock().unwrap().iter_mut().find(|e| e.id == id) {
            alvo.logo_url = Some(logo_url.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl LogoStore for FakePlatform {
    async fn upload_logo(
        &self,
        path: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, ProviderError> {
        self.tick();
        self.uploaded_paths.lock().unwrap().push(path.to_string());
        Ok(format!("http://storage.local/public/avatars/{path}"))
    }
}
