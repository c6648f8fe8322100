// src/services/company_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::directory::Role,
    models::tenancy::{Company, CompanyChanges},
    provider::{LogoStore, MembershipStore},
    services::account_service::AccountContext,
};

const MAX_LOGO_BYTES: usize = 3 * 1024 * 1024;

/// LÓGICA DE NEGÓCIO: dados cadastrais da empresa e o upload de logo em
/// dois passos (objeto público no storage, depois a URL persistida na
/// linha da empresa).
#[derive(Clone)]
pub struct CompanyService {
    store: Arc<dyn MembershipStore>,
    logos: Arc<dyn LogoStore>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn MembershipStore>, logos: Arc<dyn LogoStore>) -> Self {
        Self { store, logos }
    }

    /// Admin edita qualquer empresa; gestor apenas a própria.
    fn autorizar(ctx: &AccountContext, empresa_id: Uuid) -> Result<(), AppError> {
        match ctx.cargo {
            Some(Role::Admin) => Ok(()),
            Some(Role::Gestor) if ctx.empresa.as_ref().map(|e| e.id) == Some(empresa_id) => Ok(()),
            _ => Err(AppError::Forbidden),
        }
    }

    pub async fn update_company(
        &self,
        ctx: &AccountContext,
        empresa_id: Uuid,
        changes: CompanyChanges,
    ) -> Result<Company, AppError> {
        Self::autorizar(ctx, empresa_id)?;

        if changes.is_empty() {
            // Nada a alterar: devolve o registro como está.
            return self
                .store
                .company_by_id(empresa_id)
                .await?
                .ok_or(AppError::CompanyNotFound);
        }

        self.store
            .update_company(empresa_id, &changes)
            .await?
            .ok_or(AppError::CompanyNotFound)
    }

    pub async fn upload_logo(
        &self,
        ctx: &AccountContext,
        empresa_id: Uuid,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        Self::autorizar(ctx, empresa_id)?;

        let extensao = match content_type {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => return Err(AppError::UnsupportedImage),
        };
        if bytes.is_empty() {
            return Err(AppError::MissingUpload);
        }
        if bytes.len() > MAX_LOGO_BYTES {
            return Err(AppError::ImageTooLarge);
        }

        // O timestamp no caminho separa uploads sucessivos; a URL pública
        // resultante é a que fica gravada na linha da empresa.
        let caminho = format!(
            "logos/{}_{}.{}",
            empresa_id,
            Utc::now().timestamp_millis(),
            extensao
        );
        let url = self.logos.upload_logo(&caminho, content_type, bytes).await?;
        self.store.set_company_logo(empresa_id, &url).await?;
        Ok(url)
    }
}
