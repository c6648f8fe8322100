// src/config.rs

use std::{env, sync::Arc, time::Duration};

use crate::{
    provider::{
        GoTrueClient, IdentityProvider, LogoStore, MembershipStore, PostgrestClient, StorageClient,
    },
    services::{AccountService, CompanyService, DirectoryService, InviteService},
};

/// Timeout de cada chamada à plataforma gerenciada.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Chave privilegiada: fica no backend, nunca numa resposta.
    pub service_role_key: String,
    pub invite_redirect_url: String,
    pub port: u16,
    pub frontend_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| anyhow::anyhow!("SUPABASE_URL deve ser definida"))?;
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| anyhow::anyhow!("SUPABASE_ANON_KEY deve ser definida"))?;
        let service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| anyhow::anyhow!("SUPABASE_SERVICE_ROLE_KEY deve ser definida"))?;

        let invite_redirect_url = env::var("INVITE_REDIRECT_URL")
            .unwrap_or_else(|_| "http://localhost:5173/criar-senha".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5050);
        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            service_role_key,
            invite_redirect_url,
            port,
            frontend_origins,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub directory_service: DirectoryService,
    pub invite_service: InviteService,
    pub account_service: AccountService,
    pub company_service: CompanyService,
}

impl AppState {
    /// Monta o gráfico de dependências com os clientes reais da plataforma,
    /// uma vez só, na subida do processo.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()?;

        let identity: Arc<dyn IdentityProvider> = Arc::new(GoTrueClient::new(
            http.clone(),
            &config.supabase_url,
            &config.supabase_anon_key,
            &config.service_role_key,
        ));
        let store: Arc<dyn MembershipStore> = Arc::new(PostgrestClient::new(
            http.clone(),
            &config.supabase_url,
            &config.service_role_key,
        ));
        let logos: Arc<dyn LogoStore> = Arc::new(StorageClient::new(
            http,
            &config.supabase_url,
            &config.service_role_key,
        ));

        Ok(Self::from_parts(
            identity,
            store,
            logos,
            config.invite_redirect_url.clone(),
        ))
    }

    /// Montagem a partir de provedores já construídos — é por aqui que os
    /// testes entram com substitutos.
    pub fn from_parts(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn MembershipStore>,
        logos: Arc<dyn LogoStore>,
        invite_redirect_url: String,
    ) -> Self {
        Self {
            directory_service: DirectoryService::new(identity.clone(), store.clone()),
            invite_service: InviteService::new(identity.clone(), store.clone(), invite_redirect_url),
            account_service: AccountService::new(identity, store.clone()),
            company_service: CompanyService::new(store, logos),
        }
    }
}
