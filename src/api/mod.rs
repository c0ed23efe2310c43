pub mod accounts;
pub mod error;
pub mod photos;
pub mod postings;
pub mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Accounts
        .route("/logins", post(accounts::register))
        .route("/login", post(accounts::login))
        .route(
            "/logins/:email",
            put(accounts::update_account).delete(accounts::delete_account),
        )
        .route("/contato/:email", get(accounts::get_contact))
        // Postings
        .route("/cadastrar-projeto", post(postings::create_posting))
        .route("/projetos", get(postings::list_postings))
        .route("/editar-projeto/:id", put(postings::update_posting))
        .route("/projetos/:id", delete(postings::delete_posting))
        // Profile photos
        .route("/upload-foto", post(photos::upload_photo))
        .route("/get-foto", get(photos::get_photo))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
