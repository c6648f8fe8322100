// src/provider/gotrue.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::models::directory::{Account, Role};
use crate::provider::{failure_parts, IdentityProvider, ProviderError};

/// Tamanho de página da listagem administrativa. O contrato lógico é
/// "todas as contas": as páginas são percorridas até esgotar.
const PAGE_SIZE: usize = 1000;

/// Cliente do serviço de identidade (GoTrue). As operações administrativas
/// usam a chave privilegiada; as de sessão usam a chave pública mais o
/// token do próprio usuário. A chave privilegiada não sai daqui.
#[derive(Clone)]
pub struct GoTrueClient {
    http: Client,
    base_url: String,
    anon_key: String,
    service_key: String,
}

// ---
// Registro cru do provedor
// ---
// O formato dos metadados não é garantido: o painel antigo gravou `name`,
// `full_name` e `nome` em épocas diferentes. O mapeamento para `Account`
// concentra todos os fallbacks num único lugar.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: Option<RawUserMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUserMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub cargo: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdminUserPage {
    #[serde(default)]
    users: Vec<RawAuthUser>,
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Mapeamento único do registro cru para o tipo de domínio.
///
/// Cadeia de fallback do nome: `name` → `full_name` → `nome` → parte
/// local do e-mail → "Usuário". Cargo nos metadados: `cargo` → `role`.
pub fn map_account(raw: RawAuthUser) -> Account {
    let RawAuthUser {
        id,
        email,
        created_at,
        user_metadata,
    } = raw;
    let meta = user_metadata.unwrap_or_default();

    let nome = non_blank(&meta.name)
        .or_else(|| non_blank(&meta.full_name))
        .or_else(|| non_blank(&meta.nome))
        .map(str::to_string)
        .or_else(|| {
            non_blank(&email)
                .and_then(|e| e.split('@').next())
                .filter(|parte| !parte.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Usuário".to_string());

    let cargo_hint = non_blank(&meta.cargo)
        .or_else(|| non_blank(&meta.role))
        .and_then(Role::parse);

    Account {
        id,
        email: non_blank(&email).map(str::to_string),
        nome,
        cargo_hint,
        created_at,
    }
}

impl GoTrueClient {
    pub fn new(http: Client, base_url: &str, anon_key: &str, service_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn admin_failure((status, message): (u16, String)) -> ProviderError {
        match status {
            400 | 409 | 422 => ProviderError::Rejected(message),
            s => ProviderError::Unexpected { status: s, message },
        }
    }

    fn session_failure((status, message): (u16, String)) -> ProviderError {
        match status {
            401 | 403 => ProviderError::Unauthorized,
            400 | 409 | 422 => ProviderError::Rejected(message),
            s => ProviderError::Unexpected { status: s, message },
        }
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn list_accounts(&self) -> Result<Vec<Account>, ProviderError> {
        let mut contas = Vec::new();
        let mut page = 1usize;
        loop {
            let res = self
                .http
                .get(self.url("/admin/users"))
                .header("apikey", &self.service_key)
                .bearer_auth(&self.service_key)
                .query(&[
                    ("page", page.to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                ])
                .send()
                .await?;
            if !res.status().is_success() {
                return Err(Self::admin_failure(failure_parts(res).await));
            }
            let lote: AdminUserPage = res.json().await?;
            let recebidos = lote.users.len();
            contas.extend(lote.users.into_iter().map(map_account));
            if recebidos < PAGE_SIZE {
                return Ok(contas);
            }
            page += 1;
        }
    }

    async fn invite_by_email(
        &self,
        email: &str,
        nome: &str,
        redirect_to: &str,
    ) -> Result<Account, ProviderError> {
        let res = self
            .http
            .post(self.url("/invite"))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email, "data": { "name": nome } }))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::admin_failure(failure_parts(res).await));
        }
        Ok(map_account(res.json::<RawAuthUser>().await?))
    }

    async fn account_from_token(&self, access_token: &str) -> Result<Account, ProviderError> {
        let res = self
            .http
            .get(self.url("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::session_failure(failure_parts(res).await));
        }
        Ok(map_account(res.json::<RawAuthUser>().await?))
    }

    async fn update_profile(
        &self,
        access_token: &str,
        nome: Option<&str>,
        email: Option<&str>,
    ) -> Result<Account, ProviderError> {
        let mut corpo = serde_json::Map::new();
        if let Some(nome) = nome {
            // O painel grava o nome como `full_name` nos metadados.
            corpo.insert("data".into(), json!({ "full_name": nome }));
        }
        if let Some(email) = email {
            corpo.insert("email".into(), json!(email));
        }
        let res = self
            .http
            .put(self.url("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&corpo)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::session_failure(failure_parts(res).await));
        }
        Ok(map_account(res.json::<RawAuthUser>().await?))
    }

    async fn update_password(
        &self,
        access_token: &str,
        nova_senha: &str,
    ) -> Result<(), ProviderError> {
        let res = self
            .http
            .put(self.url("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&json!({ "password": nova_senha }))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::session_failure(failure_parts(res).await));
        }
        Ok(())
    }

    async fn verify_password(&self, email: &str, senha: &str) -> Result<bool, ProviderError> {
        let res = self
            .http
            .post(self.url("/token"))
            .header("apikey", &self.anon_key)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": senha }))
            .send()
            .await?;
        if res.status().is_success() {
            return Ok(true);
        }
        // Credencial recusada vem como 400 (invalid_grant); qualquer outra
        // coisa é falha real.
        if res.status().as_u16() == 400 {
            return Ok(false);
        }
        Err(Self::session_failure(failure_parts(res).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(email: Option<&str>, meta: RawUserMetadata) -> RawAuthUser {
        RawAuthUser {
            id: Uuid::from_u128(1),
            email: email.map(str::to_string),
            created_at: None,
            user_metadata: Some(meta),
        }
    }

    fn meta(name: Option<&str>, full_name: Option<&str>, nome: Option<&str>) -> RawUserMetadata {
        RawUserMetadata {
            name: name.map(str::to_string),
            full_name: full_name.map(str::to_string),
            nome: nome.map(str::to_string),
            cargo: None,
            role: None,
        }
    }

    #[test]
    fn nome_usa_o_campo_name() {
        let conta = map_account(raw(
            Some("ana@x.com"),
            meta(Some("Ana"), Some("Ana Silva"), None),
        ));
        assert_eq!(conta.nome, "Ana");
    }

    #[test]
    fn nome_cai_para_full_name() {
        let conta = map_account(raw(Some("ana@x.com"), meta(None, Some("Ana Silva"), None)));
        assert_eq!(conta.nome, "Ana Silva");
    }

    #[test]
    fn nome_cai_para_metadado_nome() {
        let conta = map_account(raw(Some("ana@x.com"), meta(None, None, Some("Aninha"))));
        assert_eq!(conta.nome, "Aninha");
    }

    #[test]
    fn nome_cai_para_parte_local_do_email() {
        let conta = map_account(raw(Some("ana.silva@x.com"), meta(None, None, None)));
        assert_eq!(conta.nome, "ana.silva");
    }

    #[test]
    fn nome_cai_para_sentinela_sem_email() {
        let conta = map_account(raw(None, meta(None, None, None)));
        assert_eq!(conta.nome, "Usuário");
    }

    #[test]
    fn nome_em_branco_nao_conta() {
        let conta = map_account(raw(Some("ana@x.com"), meta(Some("   "), None, None)));
        assert_eq!(conta.nome, "ana");
    }

    #[test]
    fn cargo_hint_sonda_cargo_e_role() {
        let mut m = meta(None, None, None);
        m.role = Some("gestor".to_string());
        assert_eq!(map_account(raw(None, m)).cargo_hint, Some(Role::Gestor));

        let mut m = meta(None, None, None);
        m.cargo = Some("ADMIN".to_string());
        m.role = Some("colaborador".to_string());
        assert_eq!(map_account(raw(None, m)).cargo_hint, Some(Role::Admin));
    }

    #[test]
    fn cargo_hint_ignora_valor_desconhecido() {
        let mut m = meta(None, None, None);
        m.cargo = Some("dono".to_string());
        assert_eq!(map_account(raw(None, m)).cargo_hint, None);
    }

    #[test]
    fn desserializa_registro_com_metadados_nulos() {
        let raw: RawAuthUser = serde_json::from_value(serde_json::json!({
            "id": "11111111-1111-1111-1111-111111111111",
            "email": null,
            "user_metadata": null,
        }))
        .unwrap();
        let conta = map_account(raw);
        assert_eq!(conta.nome, "Usuário");
        assert_eq!(conta.email, None);
    }
}
