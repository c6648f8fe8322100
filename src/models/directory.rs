// src/models/directory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Marcador exibido quando um campo não pôde ser resolvido.
/// Nunca devolvemos string vazia para o painel.
pub const UNKNOWN: &str = "—";

// ---
// 1. Role (O "Cargo")
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Gestor,
    Colaborador,
}

impl Role {
    /// Interpreta o valor vindo da query string ou dos metadados da conta.
    /// Valores desconhecidos viram `None` e o solicitante é tratado como
    /// não-admin.
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "gestor" => Some(Role::Gestor),
            "colaborador" => Some(Role::Colaborador),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Gestor => "gestor",
            Role::Colaborador => "colaborador",
        }
    }
}

// ---
// 2. Account (O principal gerido pelo provedor de identidade)
// ---
// Criada e destruída pelo provedor; daqui só lemos, fora as atualizações
// de perfil que o backend repassa.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub email: Option<String>,

    /// Nome já resolvido pela cadeia de fallback dos metadados
    /// (ver `provider::gotrue::map_account`).
    pub nome: String,

    /// Cargo embutido nos metadados da própria conta. Só entra em cena
    /// quando a conta não tem vínculo com empresa.
    pub cargo_hint: Option<Role>,

    pub created_at: Option<DateTime<Utc>>,
}

// ---
// 3. VisibleUser (uma linha da listagem /api/users)
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisibleUser {
    pub id: Uuid,
    pub email: String,
    pub nome: String,
    pub cargo: String,
    pub empresa_id: Option<Uuid>,
    pub empresa_nome: String,
    pub created_at: Option<DateTime<Utc>>,
}

// ---
// 4. CompanyGroup (agrupamento por empresa, modo admin)
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompanyGroup {
    pub empresa_id: Option<Uuid>,
    pub empresa_nome: String,
    pub usuarios: Vec<VisibleUser>,
}

/// Resultado da agregação: lista plana para gestor/colaborador,
/// agrupada por empresa para admin.
#[derive(Debug, Clone)]
pub enum UserListing {
    Flat(Vec<VisibleUser>),
    Grouped(Vec<CompanyGroup>),
}
