// src/handlers/invite.rs

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::directory::Role};

#[derive(Debug, Deserialize, ToSchema)]
pub struct InviteUserPayload {
    pub nome: Option<String>,
    pub email: Option<String>,

    /// Ausente = colaborador
    pub cargo: Option<Role>,

    #[serde(rename = "empresaId")]
    pub empresa_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvitedUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub nome: String,
    pub cargo: Role,
}

// POST /api/invite-user
#[utoipa::path(
    post,
    path = "/api/invite-user",
    tag = "Usuários",
    request_body = InviteUserPayload,
    responses(
        (status = 200, description = "Convite enviado e vínculo gravado"),
        (status = 400, description = "Campos obrigatórios ausentes, empresaId inválido ou recusa do provedor"),
        (status = 500, description = "Conta criada sem vínculo (corpo traz usuario_id) ou erro inesperado")
    )
)]
pub async fn invite_user(
    State(app_state): State<AppState>,
    Json(payload): Json<InviteUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Os três campos são obrigatórios, e a checagem acontece antes de
    // qualquer chamada ao provedor.
    let nome = campo(&payload.nome).ok_or(AppError::MissingInviteFields)?;
    let email = campo(&payload.email).ok_or(AppError::MissingInviteFields)?;
    let empresa_bruta = campo(&payload.empresa_id).ok_or(AppError::MissingInviteFields)?;
    let empresa_id = Uuid::parse_str(empresa_bruta)
        .map_err(|_| AppError::InvalidEmpresaId(empresa_bruta.to_string()))?;

    let (conta, cargo) = app_state
        .invite_service
        .invite(nome, email, payload.cargo, empresa_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "user": InvitedUser {
            id: conta.id,
            email: conta.email,
            nome: conta.nome,
            cargo,
        },
    })))
}

fn campo(valor: &Option<String>) -> Option<&str> {
    valor.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
