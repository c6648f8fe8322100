// src/handlers/account.rs

use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

type BearerHeader = Option<TypedHeader<Authorization<Bearer>>>;

// Header ausente é 401, igual a token recusado.
fn token(header: BearerHeader) -> Result<String, AppError> {
    header
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
        .ok_or(AppError::InvalidToken)
}

// GET /api/me
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Conta",
    responses(
        (status = 200, description = "Conta, cargo e empresa do dono do token"),
        (status = 401, description = "Token inválido ou ausente")
    ),
    security(("session_token" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    bearer: BearerHeader,
) -> Result<impl IntoResponse, AppError> {
    let token = token(bearer)?;
    let ctx = app_state.account_service.context_from_token(&token).await?;

    Ok(Json(json!({
        "user": {
            "id": ctx.conta.id,
            "email": ctx.conta.email,
            "nome": ctx.conta.nome,
        },
        "cargo": ctx.cargo,
        "empresa": ctx.empresa,
    })))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, message = "O nome não pode ficar em branco."))]
    pub nome: Option<String>,

    #[validate(email(message = "E-mail inválido."))]
    pub email: Option<String>,
}

// PUT /api/me
#[utoipa::path(
    put,
    path = "/api/me",
    tag = "Conta",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado no provedor"),
        (status = 400, description = "Dados inválidos ou recusa do provedor"),
        (status = 401, description = "Token inválido ou ausente")
    ),
    security(("session_token" = []))
)]
pub async fn update_me(
    State(app_state): State<AppState>,
    bearer: BearerHeader,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    let token = token(bearer)?;
    payload.validate()?;

    let conta = app_state
        .account_service
        .update_profile(&token, payload.nome.as_deref(), payload.email.as_deref())
        .await?;

    Ok(Json(json!({
        "user": {
            "id": conta.id,
            "email": conta.email,
            "nome": conta.nome,
        },
    })))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordPayload {
    #[validate(length(min = 1, message = "Preencha todos os campos."))]
    pub senha_atual: String,

    #[validate(length(min = 8, message = "A nova senha deve ter pelo menos 8 caracteres."))]
    pub senha_nova: String,
}

// PUT /api/me/password
#[utoipa::path(
    put,
    path = "/api/me/password",
    tag = "Conta",
    request_body = UpdatePasswordPayload,
    responses(
        (status = 200, description = "Senha trocada"),
        (status = 400, description = "Validação ou senha atual incorreta"),
        (status = 401, description = "Token inválido ou ausente")
    ),
    security(("session_token" = []))
)]
pub async fn update_password(
    State(app_state): State<AppState>,
    bearer: BearerHeader,
    Json(payload): Json<UpdatePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    let token = token(bearer)?;
    payload.validate()?;

    app_state
        .account_service
        .change_password(&token, &payload.senha_atual, &payload.senha_nova)
        .await?;

    Ok(Json(json!({ "success": true })))
}
