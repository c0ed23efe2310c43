//! Project posting models and DTOs.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Raw row produced by the `GET /projetos` join, photo still a BLOB.
#[derive(Debug, Clone, FromRow)]
pub struct PostingAuthorRow {
    pub id: i64,
    pub nome_projeto: String,
    pub descricao: String,
    pub valor: f64,
    pub qtd_pessoas: i64,
    pub telefone: String,
    pub email_autor: String,
    pub nome_autor: String,
    pub foto_perfil: Option<Vec<u8>>,
}

/// A posting joined with its author, as served by `GET /projetos` and cached
/// by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingWithAuthor {
    pub id: i64,
    pub nome_projeto: String,
    pub descricao: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor: f64,
    pub qtd_pessoas: i64,
    pub telefone: String,
    pub email_autor: String,
    pub nome_autor: String,
    /// Author's profile photo, base64-encoded.
    pub foto_perfil: Option<String>,
}

impl From<PostingAuthorRow> for PostingWithAuthor {
    fn from(row: PostingAuthorRow) -> Self {
        Self {
            id: row.id,
            nome_projeto: row.nome_projeto,
            descricao: row.descricao,
            valor: row.valor,
            qtd_pessoas: row.qtd_pessoas,
            telefone: row.telefone,
            email_autor: row.email_autor,
            nome_autor: row.nome_autor,
            foto_perfil: row.foto_perfil.map(|bytes| BASE64.encode(bytes)),
        }
    }
}

/// Accept a number, a numeric string, or anything else (mapped to 0.0).
/// Cached listing data may carry `valor` as a string; sorting must still
/// behave, with unparseable values treated as zero.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostingRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    /// Locale-formatted currency string, e.g. "1.500,50".
    pub valor: Option<String>,
    pub telefone: Option<String>,
    #[serde(
        rename = "numeroPessoas",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub numero_pessoas: Option<String>,
    pub email_autor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostingResponse {
    pub message: String,
    pub id: i64,
}

/// Partial update: value, team size and phone, plus optional name and
/// description so the edit flow can confirm every field against the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostingRequest {
    pub valor: Option<String>,
    #[serde(
        rename = "numeroPessoas",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub numero_pessoas: Option<String>,
    pub telefone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}
