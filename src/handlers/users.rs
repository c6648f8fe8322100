// src/handlers/users.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::directory::{Role, UserListing},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Cargo do solicitante; ausente ou desconhecido vale como não-admin.
    pub cargo: Option<String>,

    #[serde(rename = "empresaId")]
    pub empresa_id: Option<String>,

    /// Busca por substring em e-mail e nome (e empresa no modo admin).
    pub search: Option<String>,
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Usuários",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Lista de usuários visíveis: {users: [...]} plana, ou {empresas: [...]} agrupada para admin"),
        (status = 400, description = "empresaId ausente ou inválido"),
        (status = 500, description = "Falha no provedor")
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse, AppError> {
    // Validação antes de qualquer chamada ao provedor
    let bruto = params
        .empresa_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingEmpresaId)?;
    let empresa_id =
        Uuid::parse_str(bruto).map_err(|_| AppError::InvalidEmpresaId(bruto.to_string()))?;

    let solicitante = params.cargo.as_deref().and_then(Role::parse);

    let listagem = app_state
        .directory_service
        .list_visible_users(solicitante, empresa_id, params.search.as_deref())
        .await?;

    let corpo = match listagem {
        UserListing::Flat(users) => json!({ "users": users }),
        UserListing::Grouped(empresas) => json!({ "empresas": empresas }),
    };
    Ok(Json(corpo))
}
