//! Account models and DTOs.
//!
//! Wire field names stay in Portuguese for compatibility with the mobile
//! clients that already speak this API.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account as stored in the `logins` table.
///
/// `senha` holds an argon2 hash, never the raw password.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub email: String,
    pub nome: String,
    pub senha: String,
    pub telefone: String,
    pub foto_perfil: Option<Vec<u8>>,
    pub tipo: String,
    pub created_at: String,
}

/// The public identity slice of an account (what `/login` and `/contato`
/// return, and what the client persists as its session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AccountIdentity {
    pub nome: String,
    pub email: String,
    pub telefone: String,
}

impl From<Account> for AccountIdentity {
    fn from(account: Account) -> Self {
        Self {
            nome: account.nome,
            email: account.email,
            telefone: account.telefone,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    pub telefone: Option<String>,
    /// Optional profile photo, base64-encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto_perfil: Option<String>,
    /// Account kind tag; defaults to "usuario".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub senha: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: AccountIdentity,
}

/// Full overwrite of the mutable account fields, keyed by the previous email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    pub telefone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPhotoRequest {
    pub email: Option<String>,
    pub foto_base64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "fotoUrl")]
    pub foto_url: String,
}
