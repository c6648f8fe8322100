use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::provider::ProviderError;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda falha que chega à borda HTTP vira um corpo JSON estruturado;
// nenhum erro derruba o processo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("empresaId é obrigatório")]
    MissingEmpresaId,

    // Distinto de "ausente": o valor veio, mas não tem forma de id de empresa.
    #[error("empresaId inválido: {0}")]
    InvalidEmpresaId(String),

    #[error("Nome, e-mail e empresaId são obrigatórios.")]
    MissingInviteFields,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Senha atual incorreta")]
    WrongCurrentPassword,

    #[error("Empresa não encontrada")]
    CompanyNotFound,

    #[error("Selecione um arquivo.")]
    MissingUpload,

    #[error("Envie uma imagem PNG, JPG ou WEBP.")]
    UnsupportedImage,

    #[error("A imagem deve ter no máximo 3 MB.")]
    ImageTooLarge,

    // O provedor recusou a operação por causa do dado enviado (e-mail já
    // registrado, endereço malformado, senha fraca). A mensagem dele volta
    // ao cliente como está.
    #[error("{0}")]
    ProviderRejected(String),

    // Convite criado no provedor, mas o vínculo não foi gravado. A conta
    // existe e está solta; o id volta no corpo para o elo ser refeito sem
    // repetir o convite.
    #[error("Usuário criado, mas falha ao vincular à empresa.")]
    PartialLink { usuario_id: Uuid },

    // Falha de comunicação com a plataforma gerenciada
    #[error("Erro no provedor")]
    Provider(#[from] ProviderError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolve todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::MissingEmpresaId => (
                StatusCode::BAD_REQUEST,
                "empresaId é obrigatório".to_string(),
            ),
            AppError::InvalidEmpresaId(valor) => (
                StatusCode::BAD_REQUEST,
                format!("empresaId inválido: {valor}"),
            ),
            AppError::MissingInviteFields => (
                StatusCode::BAD_REQUEST,
                "Nome, e-mail e empresaId são obrigatórios.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Acesso negado para esta empresa.".to_string(),
            ),
            AppError::WrongCurrentPassword => (
                StatusCode::BAD_REQUEST,
                "Senha atual incorreta.".to_string(),
            ),
            AppError::CompanyNotFound => (
                StatusCode::NOT_FOUND,
                "Empresa não encontrada.".to_string(),
            ),
            AppError::MissingUpload => {
                (StatusCode::BAD_REQUEST, "Selecione um arquivo.".to_string())
            }
            AppError::UnsupportedImage => (
                StatusCode::BAD_REQUEST,
                "Envie uma imagem PNG, JPG ou WEBP.".to_string(),
            ),
            AppError::ImageTooLarge => (
                StatusCode::BAD_REQUEST,
                "A imagem deve ter no máximo 3 MB.".to_string(),
            ),

            AppError::ProviderRejected(msg) => (StatusCode::BAD_REQUEST, msg),

            // Corpo próprio: carrega o id da conta criada e sem vínculo.
            AppError::PartialLink { usuario_id } => {
                tracing::error!(
                    "⚠️ Usuário {} criado no provedor, mas o vínculo não foi gravado",
                    usuario_id
                );
                let body = Json(json!({
                    "error": "Usuário criado, mas falha ao vincular à empresa.",
                    "usuario_id": usuario_id,
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }

            // Um token de sessão recusado pelo provedor é 401, não 500.
            AppError::Provider(ProviderError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),

            // Todos os outros (Provider, Internal) viram 500 com mensagem
            // genérica; o detalhe fica no log do servidor.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
