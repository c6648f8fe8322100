// src/provider/storage.rs

use async_trait::async_trait;
use reqwest::Client;

use crate::provider::{failure_parts, LogoStore, ProviderError};

/// Bucket público onde as logos das empresas ficam.
const BUCKET: &str = "avatars";

/// Cliente do serviço de storage de objetos da plataforma.
#[derive(Clone)]
pub struct StorageClient {
    http: Client,
    base_url: String,
    service_key: String,
}

impl StorageClient {
    pub fn new(http: Client, base_url: &str, service_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn failure((status, message): (u16, String)) -> ProviderError {
        match status {
            400 | 409 | 422 => ProviderError::Rejected(message),
            s => ProviderError::Unexpected { status: s, message },
        }
    }
}

#[async_trait]
impl LogoStore for StorageClient {
    async fn upload_logo(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ProviderError> {
        // Upsert: reenvio da logo sobrescreve o objeto. A URL pública é
        // estável; o painel faz cache-busting com `?t=...` na leitura.
        let res = self
            .http
            .post(format!(
                "{}/storage/v1/object/{}/{}",
                self.base_url, BUCKET, path
            ))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::failure(failure_parts(res).await));
        }
        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, BUCKET, path
        ))
    }
}
