//! Typed client for the Postr API plus the client-side listing machinery:
//! the listing cache with its search/sort views, the two-phase posting
//! draft, and the structured local store.

pub mod cache;
pub mod draft;
pub mod store;

pub use cache::{ListingCache, SortMode};
pub use draft::Draft;
pub use store::{LocalStore, Session};

use reqwest::{Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::api::error::ErrorResponse;
use crate::api::validation::{validate_email, validate_nome, validate_senha, validate_telefone};
use crate::db::{
    AccountIdentity, CreatePostingRequest, CreatePostingResponse, LoginRequest, LoginResponse,
    PhotoResponse, PostingWithAuthor, RegisterRequest, UpdateAccountRequest,
    UpdatePostingRequest, UploadPhotoRequest,
};

/// Client-side error taxonomy: validation failures are caught before any
/// request is sent, request errors carry the server's message verbatim, and
/// transport errors cover everything below HTTP.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("server rejected request ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("could not reach server: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Status of the server rejection, if this is a request error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// HTTP client for the Postr API.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx response into `ClientError::Api`, preferring the
    /// server-provided message over a generic fallback.
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!("request failed with status {}", status),
        };

        Err(ClientError::Api { status, message })
    }

    /// Register a new account. All fields are validated locally before the
    /// request is sent, mirroring the server-side rules.
    pub async fn register(
        &self,
        nome: &str,
        email: &str,
        senha: &str,
        telefone: &str,
    ) -> Result<(), ClientError> {
        validate_nome(nome).map_err(|e| ClientError::validation("nome", e))?;
        validate_email(email).map_err(|e| ClientError::validation("email", e))?;
        validate_senha(senha).map_err(|e| ClientError::validation("senha", e))?;
        validate_telefone(telefone).map_err(|e| ClientError::validation("telefone", e))?;

        let req = RegisterRequest {
            nome: Some(nome.to_string()),
            email: Some(email.to_string()),
            senha: Some(senha.to_string()),
            telefone: Some(telefone.to_string()),
            foto_perfil: None,
            tipo: None,
        };

        let response = self.http.post(self.url("/logins")).json(&req).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Authenticate and return the account identity the caller should
    /// persist as its session.
    pub async fn login(&self, email: &str, senha: &str) -> Result<AccountIdentity, ClientError> {
        let req = LoginRequest {
            email: Some(email.to_string()),
            senha: Some(senha.to_string()),
        };

        let response = self.http.post(self.url("/login")).json(&req).send().await?;
        let body: LoginResponse = Self::check(response).await?.json().await?;
        Ok(body.user)
    }

    /// Overwrite the account's mutable fields, keyed by its previous email.
    pub async fn update_account(
        &self,
        email_antigo: &str,
        nome: &str,
        email: &str,
        senha: &str,
        telefone: &str,
    ) -> Result<(), ClientError> {
        validate_nome(nome).map_err(|e| ClientError::validation("nome", e))?;
        validate_email(email).map_err(|e| ClientError::validation("email", e))?;
        validate_senha(senha).map_err(|e| ClientError::validation("senha", e))?;
        validate_telefone(telefone).map_err(|e| ClientError::validation("telefone", e))?;

        let req = UpdateAccountRequest {
            nome: Some(nome.to_string()),
            email: Some(email.to_string()),
            senha: Some(senha.to_string()),
            telefone: Some(telefone.to_string()),
        };

        let response = self
            .http
            .put(self.url(&format!("/logins/{}", email_antigo)))
            .json(&req)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Delete the account server-side. Callers should clear local state
    /// afterwards (see `LocalStore::clear_account`).
    pub async fn delete_account(&self, email: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/logins/{}", email)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Submit a completed posting and return its assigned id.
    pub async fn create_posting(
        &self,
        req: &CreatePostingRequest,
    ) -> Result<i64, ClientError> {
        let response = self
            .http
            .post(self.url("/cadastrar-projeto"))
            .json(req)
            .send()
            .await?;
        let body: CreatePostingResponse = Self::check(response).await?.json().await?;
        Ok(body.id)
    }

    /// Fetch the full posting list, newest first.
    pub async fn list_postings(&self) -> Result<Vec<PostingWithAuthor>, ClientError> {
        let response = self.http.get(self.url("/projetos")).send().await?;
        let postings = Self::check(response).await?.json().await?;
        Ok(postings)
    }

    /// Partial posting update.
    pub async fn update_posting(
        &self,
        id: i64,
        req: &UpdatePostingRequest,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/editar-projeto/{}", id)))
            .json(req)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Hard delete a posting by id.
    pub async fn delete_posting(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/projetos/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Upload a profile photo (base64 payload or data URL); returns the
    /// `fotoUrl` the client can render immediately.
    pub async fn upload_photo(
        &self,
        email: &str,
        foto_base64: &str,
    ) -> Result<String, ClientError> {
        let req = UploadPhotoRequest {
            email: Some(email.to_string()),
            foto_base64: Some(foto_base64.to_string()),
        };

        let response = self
            .http
            .post(self.url("/upload-foto"))
            .json(&req)
            .send()
            .await?;
        let body: PhotoResponse = Self::check(response).await?.json().await?;
        Ok(body.foto_url)
    }

    /// Fetch a profile photo as a data URL.
    pub async fn get_photo(&self, email: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .get(self.url("/get-foto"))
            .query(&[("email", email)])
            .send()
            .await?;
        let body: PhotoResponse = Self::check(response).await?.json().await?;
        Ok(body.foto_url)
    }

    /// Contact details of a posting author.
    pub async fn get_contact(&self, email: &str) -> Result<AccountIdentity, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/contato/{}", email)))
            .send()
            .await?;
        let identity = Self::check(response).await?.json().await?;
        Ok(identity)
    }
}
