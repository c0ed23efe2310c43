//! Profile photo upload and retrieval.
//!
//! Photos travel as base64 payloads (optionally wrapped in a data URL) and
//! are stored as BLOBs on the account row.

use axum::{
    extract::{Query, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::{PhotoResponse, UploadPhotoRequest};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::required;

lazy_static! {
    /// Matches the "data:image/...;base64," prefix clients may send
    static ref DATA_URL_PREFIX: Regex = Regex::new(r"^data:image/\w+;base64,").unwrap();
}

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    pub email: Option<String>,
}

/// Store a profile photo (POST /upload-foto). Returns the submitted payload
/// back as `fotoUrl` so the client can render it immediately.
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadPhotoRequest>,
) -> Result<Json<PhotoResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    let email = required(&req.email);
    let foto = required(&req.foto_base64);
    if email.is_none() {
        errors.add("email", "Email is required");
    }
    if foto.is_none() {
        errors.add("foto_base64", "Photo is required");
    }
    errors.finish()?;

    let foto = foto.unwrap_or_default();
    let encoded = DATA_URL_PREFIX.replace(foto, "");
    let bytes = BASE64
        .decode(encoded.as_bytes())
        .map_err(|_| ApiError::validation_field("foto_base64", "Invalid base64 photo"))?;

    let result = sqlx::query("UPDATE logins SET foto_perfil = ? WHERE email = ?")
        .bind(&bytes)
        .bind(email.unwrap_or_default())
        .execute(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store photo: {}", e);
            ApiError::database("Failed to store photo")
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Account not found"));
    }

    Ok(Json(PhotoResponse {
        message: Some("Photo updated successfully".to_string()),
        foto_url: foto.to_string(),
    }))
}

/// Fetch a profile photo as a data URL (GET /get-foto?email=)
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PhotoQuery>,
) -> Result<Json<PhotoResponse>, ApiError> {
    let email = required(&query.email)
        .ok_or_else(|| ApiError::validation_field("email", "Email is required"))?;

    let row: Option<(Option<Vec<u8>>,)> =
        sqlx::query_as("SELECT foto_perfil FROM logins WHERE email = ?")
            .bind(email)
            .fetch_optional(&state.db)
            .await?;

    let foto = row
        .and_then(|(foto,)| foto)
        .ok_or_else(|| ApiError::not_found("Photo not found"))?;

    Ok(Json(PhotoResponse {
        message: None,
        foto_url: format!("data:image/jpeg;base64,{}", BASE64.encode(foto)),
    }))
}
