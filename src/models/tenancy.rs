// src/models/tenancy.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::directory::Role;

// ---
// 1. Company (A "Empresa")
// ---
// Linha da tabela `empresas` na plataforma gerenciada.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: Uuid,
    pub nome: String,
    pub cnpj: Option<String>,
    pub dominio: Option<String>,

    // A coluna persistida chama-se literalmente "logoUrl"
    #[serde(rename = "logoUrl")]
    pub logo_url: Option<String>,

    pub telefone: Option<String>,
}

/// Projeção `{id, nome}` usada na montagem da listagem de usuários.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyRef {
    pub id: Uuid,
    pub nome: String,
}

/// Campos editáveis da empresa. `None` significa "não alterar";
/// o corpo serializado vira o PATCH enviado à tabela.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct CompanyChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
}

impl CompanyChanges {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.cnpj.is_none()
            && self.dominio.is_none()
            && self.telefone.is_none()
    }
}

// ---
// 2. Membership (O "Vínculo" usuário-empresa)
// ---
// Linha da tabela `usuarios_empresas`. O cargo mora aqui, não na conta:
// a mesma conta poderia ter cargos diferentes em empresas diferentes.
// O sistema assume no máximo um vínculo ativo por conta ao resolver
// "minha empresa".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Membership {
    pub usuario_id: Uuid,
    pub empresa_id: Uuid,
    pub cargo: Role,
    pub ativo: bool,
}
