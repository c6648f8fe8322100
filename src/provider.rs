// src/provider.rs
//
// Acesso à plataforma gerenciada (identidade, linhas e storage), sempre
// pelos contratos HTTP documentados dela. Os handlers nunca falam com a
// plataforma diretamente: recebem estes traits já injetados via AppState,
// o que permite substituir os provedores nos testes.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::directory::Account;
use crate::models::tenancy::{Company, CompanyChanges, CompanyRef, Membership};

pub mod gotrue;
pub use gotrue::GoTrueClient;
pub mod postgrest;
pub use postgrest::PostgrestClient;
pub mod storage;
pub use storage::StorageClient;

/// Falhas na comunicação com a plataforma gerenciada.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Falha de transporte (conexão, timeout, TLS).
    #[error("falha na chamada ao provedor: {0}")]
    Http(#[from] reqwest::Error),

    /// O token de sessão apresentado não é aceito pelo provedor.
    #[error("token de sessão rejeitado pelo provedor")]
    Unauthorized,

    /// O provedor recusou a operação por causa do dado enviado
    /// (e-mail já registrado, endereço malformado, senha fraca).
    #[error("{0}")]
    Rejected(String),

    /// Resposta fora do contrato documentado.
    #[error("resposta inesperada do provedor ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

/// Extrai status e mensagem de uma resposta de falha. Os três serviços da
/// plataforma variam o campo da mensagem, então todos são sondados aqui,
/// num lugar só.
pub(crate) async fn failure_parts(res: reqwest::Response) -> (u16, String) {
    let status = res.status().as_u16();
    let message = match res.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("msg")
            .or_else(|| body.get("message"))
            .or_else(|| body.get("error_description"))
            .or_else(|| body.get("error"))
            .and_then(|v| v.as_str())
            .unwrap_or("sem detalhe")
            .to_string(),
        Err(_) => "sem detalhe".to_string(),
    };
    (status, message)
}

/// Diretório de contas do provedor de identidade e as operações de sessão
/// que o backend repassa em nome do usuário.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Diretório completo de contas (listagem administrativa paginada).
    async fn list_accounts(&self) -> Result<Vec<Account>, ProviderError>;

    /// Convida por e-mail; o provedor manda o link apontando para
    /// `redirect_to` (a página de criar senha).
    async fn invite_by_email(
        &self,
        email: &str,
        nome: &str,
        redirect_to: &str,
    ) -> Result<Account, ProviderError>;

    /// Resolve a conta dona do token de sessão.
    async fn account_from_token(&self, access_token: &str) -> Result<Account, ProviderError>;

    /// Atualiza nome e/ou e-mail do dono do token.
    async fn update_profile(
        &self,
        access_token: &str,
        nome: Option<&str>,
        email: Option<&str>,
    ) -> Result<Account, ProviderError>;

    /// Troca a senha do dono do token.
    async fn update_password(
        &self,
        access_token: &str,
        nova_senha: &str,
    ) -> Result<(), ProviderError>;

    /// Confere credenciais sem abrir sessão aqui no backend.
    async fn verify_password(&self, email: &str, senha: &str) -> Result<bool, ProviderError>;
}

/// Tabelas `usuarios_empresas` e `empresas` na API de linhas da plataforma.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Vínculos ativos. Com `empresa_id`, o recorte acontece no filtro da
    /// própria consulta, não em memória.
    async fn active_memberships(
        &self,
        empresa_id: Option<Uuid>,
    ) -> Result<Vec<Membership>, ProviderError>;

    /// O vínculo ativo de uma conta, se houver.
    async fn active_membership_for(
        &self,
        usuario_id: Uuid,
    ) -> Result<Option<Membership>, ProviderError>;

    async fn insert_membership(&self, vinculo: &Membership) -> Result<(), ProviderError>;

    /// Projeção `{id, nome}` apenas das empresas pedidas.
    async fn companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CompanyRef>, ProviderError>;

    async fn company_by_id(&self, id: Uuid) -> Result<Option<Company>, ProviderError>;

    /// `None` quando a empresa não existe.
    async fn update_company(
        &self,
        id: Uuid,
        changes: &CompanyChanges,
    ) -> Result<Option<Company>, ProviderError>;

    async fn set_company_logo(&self, id: Uuid, logo_url: &str) -> Result<(), ProviderError>;
}

/// Objetos públicos (logos de empresa) no serviço de storage.
#[async_trait]
pub trait LogoStore: Send + Sync {
    /// Sobe o objeto e devolve a URL pública dele.
    async fn upload_logo(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ProviderError>;
}
