// src/lib.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod provider;
pub mod services;

pub use config::{AppState, Config};

/// Router completo da aplicação. Os testes de integração usam exatamente
/// esta montagem, só trocando os provedores dentro do `AppState`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/invite-user", post(handlers::invite::invite_user))
        .route(
            "/api/me",
            get(handlers::account::get_me).put(handlers::account::update_me),
        )
        .route("/api/me/password", put(handlers::account::update_password))
        .route("/api/empresas/{id}", put(handlers::company::update_company))
        .route(
            "/api/empresas/{id}/logo",
            post(handlers::company::upload_logo),
        )
        // A logo pode ter até 3 MB; o limite padrão do axum (2 MB) cortaria
        // o upload antes da validação de tamanho.
        .layer(DefaultBodyLimit::max(4 * 1024 * 1024))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(state)
}
