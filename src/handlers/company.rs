// src/handlers/company.rs

use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::tenancy::CompanyChanges};

type BearerHeader = Option<TypedHeader<Authorization<Bearer>>>;

fn token(header: BearerHeader) -> Result<String, AppError> {
    header
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
        .ok_or(AppError::InvalidToken)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 1, message = "O nome da empresa não pode ficar em branco."))]
    pub nome: Option<String>,
    pub cnpj: Option<String>,
    pub dominio: Option<String>,
    pub telefone: Option<String>,
}

// PUT /api/empresas/{id}
#[utoipa::path(
    put,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    request_body = UpdateCompanyPayload,
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa atualizada", body = crate::models::tenancy::Company),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Token inválido ou ausente"),
        (status = 403, description = "Sem permissão para esta empresa")
    ),
    security(("session_token" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    bearer: BearerHeader,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let token = token(bearer)?;
    payload.validate()?;

    let ctx = app_state.account_service.context_from_token(&token).await?;
    let changes = CompanyChanges {
        nome: payload.nome,
        cnpj: payload.cnpj,
        dominio: payload.dominio,
        telefone: payload.telefone,
    };
    let empresa = app_state
        .company_service
        .update_company(&ctx, id, changes)
        .await?;

    Ok(Json(empresa))
}

// POST /api/empresas/{id}/logo
#[utoipa::path(
    post,
    path = "/api/empresas/{id}/logo",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Logo publicada; corpo traz a URL pública"),
        (status = 400, description = "Arquivo ausente, tipo não suportado ou acima de 3 MB"),
        (status = 401, description = "Token inválido ou ausente"),
        (status = 403, description = "Sem permissão para esta empresa")
    ),
    security(("session_token" = []))
)]
pub async fn upload_logo(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    bearer: BearerHeader,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let token = token(bearer)?;
    let ctx = app_state.account_service.context_from_token(&token).await?;

    // Campo `file` do formulário
    let mut arquivo: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| anyhow::anyhow!("multipart inválido: {e}"))?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().map(str::to_string).unwrap_or_default();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| anyhow::anyhow!("falha lendo o upload: {e}"))?;
            arquivo = Some((content_type, bytes.to_vec()));
            break;
        }
    }
    let (content_type, bytes) = arquivo.ok_or(AppError::MissingUpload)?;

    let logo_url = app_state
        .company_service
        .upload_logo(&ctx, id, &content_type, bytes)
        .await?;

    Ok(Json(json!({ "success": true, "logoUrl": logo_url })))
}
