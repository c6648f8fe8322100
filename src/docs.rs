// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Usuários ---
        handlers::users::list_users,
        handlers::invite::invite_user,

        // --- Conta ---
        handlers::account::get_me,
        handlers::account::update_me,
        handlers::account::update_password,

        // --- Empresas ---
        handlers::company::update_company,
        handlers::company::upload_logo,
    ),
    components(
        schemas(
            models::directory::Role,
            models::directory::Account,
            models::directory::VisibleUser,
            models::directory::CompanyGroup,
            models::tenancy::Company,
            models::tenancy::CompanyRef,
            models::tenancy::Membership,
            handlers::invite::InviteUserPayload,
            handlers::invite::InvitedUser,
            handlers::account::UpdateProfilePayload,
            handlers::account::UpdatePasswordPayload,
            handlers::company::UpdateCompanyPayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Usuários", description = "Listagem e convite de usuários"),
        (name = "Conta", description = "Conta do usuário autenticado"),
        (name = "Empresas", description = "Dados cadastrais e logo da empresa"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
