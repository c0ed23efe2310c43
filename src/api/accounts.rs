//! Account registration, authentication and profile endpoints.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;

use crate::db::{
    Account, AccountIdentity, Ack, LoginRequest, LoginResponse, RegisterRequest,
    UpdateAccountRequest,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{
    required, validate_email, validate_nome, validate_senha, validate_telefone,
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Validate the four identity fields shared by register and account update.
/// Returns (nome, email, senha, telefone) once everything passes.
fn validate_identity_fields<'a>(
    nome: &'a Option<String>,
    email: &'a Option<String>,
    senha: &'a Option<String>,
    telefone: &'a Option<String>,
) -> Result<(&'a str, &'a str, &'a str, &'a str), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    let checks: [(&str, Option<&str>, fn(&str) -> Result<(), String>); 4] = [
        ("nome", required(nome), validate_nome),
        ("email", required(email), validate_email),
        ("senha", required(senha), validate_senha),
        ("telefone", required(telefone), validate_telefone),
    ];

    for (field, value, validate) in checks {
        match value {
            None => {
                errors.add(field, format!("{} is required", field));
            }
            Some(v) => {
                if let Err(e) = validate(v) {
                    errors.add(field, e);
                }
            }
        }
    }

    errors.finish()?;

    // All four are Some once validation passed
    Ok((
        required(nome).unwrap_or_default(),
        required(email).unwrap_or_default(),
        required(senha).unwrap_or_default(),
        required(telefone).unwrap_or_default(),
    ))
}

/// Register a new account (POST /logins)
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Ack>), ApiError> {
    let (nome, email, senha, telefone) =
        validate_identity_fields(&req.nome, &req.email, &req.senha, &req.telefone)?;

    let foto = match req.foto_perfil.as_deref() {
        Some(encoded) if !encoded.is_empty() => Some(
            BASE64
                .decode(encoded)
                .map_err(|_| ApiError::validation_field("foto_perfil", "Invalid base64 photo"))?,
        ),
        _ => None,
    };

    let senha_hash = hash_password(senha)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;
    let tipo = req.tipo.as_deref().unwrap_or("usuario");
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO logins (email, nome, senha, telefone, foto_perfil, tipo, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(email)
    .bind(nome)
    .bind(&senha_hash)
    .bind(telefone)
    .bind(&foto)
    .bind(tipo)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to register account: {}", e);
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::conflict("An account with this email already exists")
        } else {
            ApiError::database("Failed to register account")
        }
    })?;

    tracing::info!(email, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(Ack::new("Account registered successfully")),
    ))
}

/// Authenticate by email and password (POST /login)
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    let email = required(&req.email);
    let senha = required(&req.senha);
    if email.is_none() {
        errors.add("email", "Email is required");
    }
    if senha.is_none() {
        errors.add("senha", "Password is required");
    }
    errors.finish()?;

    let account: Option<Account> = sqlx::query_as("SELECT * FROM logins WHERE email = ?")
        .bind(email.unwrap_or_default())
        .fetch_optional(&state.db)
        .await?;

    let account = account.ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !verify_password(senha.unwrap_or_default(), &account.senha) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    Ok(Json(LoginResponse {
        user: AccountIdentity::from(account),
    }))
}

/// Overwrite the mutable account fields, keyed by the previous email
/// (PUT /logins/:email_antigo)
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(email_antigo): Path<String>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<Json<Ack>, ApiError> {
    let (nome, email, senha, telefone) =
        validate_identity_fields(&req.nome, &req.email, &req.senha, &req.telefone)?;

    let senha_hash = hash_password(senha)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    let result = sqlx::query(
        r#"
        UPDATE logins
        SET nome = ?, email = ?, senha = ?, telefone = ?
        WHERE email = ?
        "#,
    )
    .bind(nome)
    .bind(email)
    .bind(&senha_hash)
    .bind(telefone)
    .bind(&email_antigo)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update account: {}", e);
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::conflict("An account with this email already exists")
        } else {
            ApiError::database("Failed to update account")
        }
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Account not found"));
    }

    Ok(Json(Ack::new("Account updated successfully")))
}

/// Delete an account (DELETE /logins/:email). Postings by this author stop
/// being visible in listings because the listing query joins on the author.
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    let result = sqlx::query("DELETE FROM logins WHERE email = ?")
        .bind(&email)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Account not found"));
    }

    tracing::info!(email, "Account deleted");

    Ok(Json(Ack::new("Account deleted successfully")))
}

/// Contact details for a posting author (GET /contato/:email)
pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<AccountIdentity>, ApiError> {
    let identity: Option<AccountIdentity> =
        sqlx::query_as("SELECT nome, email, telefone FROM logins WHERE email = ?")
            .bind(&email)
            .fetch_optional(&state.db)
            .await?;

    identity
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Account not found"))
}
