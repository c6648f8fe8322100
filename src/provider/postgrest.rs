// src/provider/postgrest.rs

use async_trait::async_trait;
use reqwest::Client;
use uuid::Uuid;

use crate::models::tenancy::{Company, CompanyChanges, CompanyRef, Membership};
use crate::provider::{failure_parts, MembershipStore, ProviderError};

const COLUNAS_EMPRESA: &str = "id,nome,cnpj,dominio,logoUrl,telefone";

/// Acesso às tabelas `usuarios_empresas` e `empresas` pela API de linhas
/// da plataforma (filtros `eq.`/`in.()` na query string). Sempre com a
/// chave privilegiada: este backend é o único lado confiável.
#[derive(Clone)]
pub struct PostgrestClient {
    http: Client,
    base_url: String,
    service_key: String,
}

impl PostgrestClient {
    pub fn new(http: Client, base_url: &str, service_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    fn failure((status, message): (u16, String)) -> ProviderError {
        match status {
            400 | 409 | 422 => ProviderError::Rejected(message),
            s => ProviderError::Unexpected { status: s, message },
        }
    }
}

#[async_trait]
impl MembershipStore for PostgrestClient {
    async fn active_memberships(
        &self,
        empresa_id: Option<Uuid>,
    ) -> Result<Vec<Membership>, ProviderError> {
        let mut req = self
            .auth(self.http.get(self.url("usuarios_empresas")))
            .query(&[
                ("select", "usuario_id,empresa_id,cargo,ativo"),
                ("ativo", "eq.true"),
            ]);
        // Recorte por empresa no filtro da própria consulta
        if let Some(id) = empresa_id {
            req = req.query(&[("empresa_id", format!("eq.{id}"))]);
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            return Err(Self::failure(failure_parts(res).await));
        }
        Ok(res.json().await?)
    }

    async fn active_membership_for(
        &self,
        usuario_id: Uuid,
    ) -> Result<Option<Membership>, ProviderError> {
        let res = self
            .auth(self.http.get(self.url("usuarios_empresas")))
            .query(&[
                ("select", "usuario_id,empresa_id,cargo,ativo".to_string()),
                ("usuario_id", format!("eq.{usuario_id}")),
                ("ativo", "eq.true".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::failure(failure_parts(res).await));
        }
        let linhas: Vec<Membership> = res.json().await?;
        Ok(linhas.into_iter().next())
    }

    async fn insert_membership(&self, vinculo: &Membership) -> Result<(), ProviderError> {
        let res = self
            .auth(self.http.post(self.url("usuarios_empresas")))
            .header("Prefer", "return=minimal")
            .json(&[vinculo])
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::failure(failure_parts(res).await));
        }
        Ok(())
    }

    async fn companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CompanyRef>, ProviderError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let lista = ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let res = self
            .auth(self.http.get(self.url("empresas")))
            .query(&[
                ("select", "id,nome".to_string()),
                ("id", format!("in.({lista})")),
            ])
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::failure(failure_parts(res).await));
        }
        Ok(res.json().await?)
    }

    async fn company_by_id(&self, id: Uuid) -> Result<Option<Company>, ProviderError> {
        let res = self
            .auth(self.http.get(self.url("empresas")))
            .query(&[
                ("select", COLUNAS_EMPRESA.to_string()),
                ("id", format!("eq.{id}")),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::failure(failure_parts(res).await));
        }
        let linhas: Vec<Company> = res.json().await?;
        Ok(linhas.into_iter().next())
    }

    async fn update_company(
        &self,
        id: Uuid,
        changes: &CompanyChanges,
    ) -> Result<Option<Company>, ProviderError> {
        let res = self
            .auth(self.http.patch(self.url("empresas")))
            .header("Prefer", "return=representation")
            .query(&[
                ("select", COLUNAS_EMPRESA.to_string()),
                ("id", format!("eq.{id}")),
            ])
            .json(changes)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::failure(failure_parts(res).await));
        }
        let linhas: Vec<Company> = res.json().await?;
        Ok(linhas.into_iter().next())
    }

    async fn set_company_logo(&self, id: Uuid, logo_url: &str) -> Result<(), ProviderError> {
        let res = self
            .auth(self.http.patch(self.url("empresas")))
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{id}"))])
            .json(&serde_json::json!({ "logoUrl": logo_url }))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::failure(failure_parts(res).await));
        }
        Ok(())
    }
}
