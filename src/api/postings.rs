//! Project posting CRUD endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    Ack, CreatePostingRequest, CreatePostingResponse, PostingAuthorRow, PostingWithAuthor,
    UpdatePostingRequest,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{parse_numero_pessoas, parse_valor, required};

/// Create a posting (POST /cadastrar-projeto)
pub async fn create_posting(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePostingRequest>,
) -> Result<(StatusCode, Json<CreatePostingResponse>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    let nome = required(&req.nome);
    let descricao = required(&req.descricao);
    let valor = required(&req.valor);
    let telefone = required(&req.telefone);
    let email_autor = required(&req.email_autor);

    if nome.is_none() {
        errors.add("nome", "Project name is required");
    }
    if descricao.is_none() {
        errors.add("descricao", "Description is required");
    }
    if valor.is_none() {
        errors.add("valor", "Value is required");
    }
    if telefone.is_none() {
        errors.add("telefone", "Phone is required");
    }
    if email_autor.is_none() {
        errors.add("email_autor", "Author email is required");
    }
    errors.finish()?;

    let valor_numerico = parse_valor(valor.unwrap_or_default()).ok_or_else(|| {
        ApiError::validation_field("valor", "Value must be a number like 1.500,50")
    })?;
    let qtd_pessoas = parse_numero_pessoas(req.numero_pessoas.as_deref());
    let data_criacao = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        INSERT INTO projetos (
            nome_projeto, descricao, valor, data_criacao, telefone, qtd_pessoas, email_autor
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(nome.unwrap_or_default())
    .bind(descricao.unwrap_or_default())
    .bind(valor_numerico)
    .bind(&data_criacao)
    .bind(telefone.unwrap_or_default())
    .bind(qtd_pessoas)
    .bind(email_autor.unwrap_or_default())
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create posting: {}", e);
        ApiError::database("Failed to create posting")
    })?;

    let id = result.last_insert_rowid();
    tracing::info!(id, "Posting created");

    Ok((
        StatusCode::CREATED,
        Json(CreatePostingResponse {
            message: "Posting created successfully".to_string(),
            id,
        }),
    ))
}

/// List every posting joined with its author (GET /projetos).
///
/// Creation time descending is the sole ordering guarantee the store makes;
/// anything else is computed client-side. Postings whose author no longer
/// exists drop out through the INNER JOIN.
pub async fn list_postings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostingWithAuthor>>, ApiError> {
    let rows = sqlx::query_as::<_, PostingAuthorRow>(
        r#"
        SELECT
            p.id,
            p.nome_projeto,
            p.descricao,
            p.valor,
            p.qtd_pessoas,
            p.telefone,
            p.email_autor,
            l.nome AS nome_autor,
            l.foto_perfil
        FROM projetos p
        INNER JOIN logins l ON p.email_autor = l.email
        ORDER BY p.data_criacao DESC, p.id DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    let postings = rows.into_iter().map(PostingWithAuthor::from).collect();
    Ok(Json(postings))
}

/// Partial posting update (PUT /editar-projeto/:id). Value and phone are
/// required; team size defaults to 1; name and description only change when
/// provided.
pub async fn update_posting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePostingRequest>,
) -> Result<Json<Ack>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    let valor = required(&req.valor);
    let telefone = required(&req.telefone);

    if valor.is_none() {
        errors.add("valor", "Value is required");
    }
    if telefone.is_none() {
        errors.add("telefone", "Phone is required");
    }
    errors.finish()?;

    let valor_numerico = parse_valor(valor.unwrap_or_default()).ok_or_else(|| {
        ApiError::validation_field("valor", "Value must be a number like 1.500,50")
    })?;
    let qtd_pessoas = parse_numero_pessoas(req.numero_pessoas.as_deref());

    let result = sqlx::query(
        r#"
        UPDATE projetos SET
            valor = ?,
            qtd_pessoas = ?,
            telefone = ?,
            nome_projeto = COALESCE(?, nome_projeto),
            descricao = COALESCE(?, descricao)
        WHERE id = ?
        "#,
    )
    .bind(valor_numerico)
    .bind(qtd_pessoas)
    .bind(telefone.unwrap_or_default())
    .bind(required(&req.nome))
    .bind(required(&req.descricao))
    .bind(id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update posting: {}", e);
        ApiError::database("Failed to update posting")
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Posting not found"));
    }

    Ok(Json(Ack::new("Posting updated successfully")))
}

/// Hard delete by id (DELETE /projetos/:id)
pub async fn delete_posting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    let result = sqlx::query("DELETE FROM projetos WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Posting not found"));
    }

    tracing::info!(id, "Posting deleted");

    Ok(Json(Ack::new("Posting deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::accounts::register;
    use crate::config::Config;
    use crate::db::RegisterRequest;
    use axum::response::IntoResponse;

    async fn test_state() -> Arc<AppState> {
        let db = crate::db::init_in_memory().await.unwrap();
        Arc::new(AppState::new(Config::default(), db))
    }

    async fn register_author(state: &Arc<AppState>, email: &str) {
        register(
            State(state.clone()),
            Json(RegisterRequest {
                nome: Some("Ana Souza".to_string()),
                email: Some(email.to_string()),
                senha: Some("abc123".to_string()),
                telefone: Some("(11)98888-7777".to_string()),
                foto_perfil: None,
                tipo: None,
            }),
        )
        .await
        .unwrap();
    }

    fn posting_request(nome: &str, valor: &str, email_autor: &str) -> CreatePostingRequest {
        CreatePostingRequest {
            nome: Some(nome.to_string()),
            descricao: Some("Uma horta no bairro".to_string()),
            valor: Some(valor.to_string()),
            telefone: Some("(11)98888-7777".to_string()),
            numero_pessoas: Some("4".to_string()),
            email_autor: Some(email_autor.to_string()),
        }
    }

    async fn create(state: &Arc<AppState>, req: CreatePostingRequest) -> i64 {
        let (status, Json(resp)) = create_posting(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        resp.id
    }

    #[tokio::test]
    async fn created_posting_appears_with_resolved_author() {
        let state = test_state().await;
        register_author(&state, "a@b.com").await;

        let id = create(
            &state,
            posting_request("Horta Comunitária", "1.500,50", "a@b.com"),
        )
        .await;

        let Json(postings) = list_postings(State(state)).await.unwrap();
        let p = postings.iter().find(|p| p.id == id).expect("posting listed");

        assert_eq!(p.nome_projeto, "Horta Comunitária");
        assert_eq!(p.valor, 1500.50);
        assert_eq!(p.qtd_pessoas, 4);
        assert_eq!(p.nome_autor, "Ana Souza");
        assert_eq!(p.email_autor, "a@b.com");
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let state = test_state().await;
        register_author(&state, "a@b.com").await;

        let mut req = posting_request("Horta", "100", "a@b.com");
        req.descricao = None;
        req.valor = Some(String::new()); // empty counts as missing

        let err = create_posting(State(state), Json(req)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn team_size_defaults_to_one() {
        let state = test_state().await;
        register_author(&state, "a@b.com").await;

        let mut req = posting_request("Horta", "100", "a@b.com");
        req.numero_pessoas = None;
        let id = create(&state, req).await;

        let Json(postings) = list_postings(State(state)).await.unwrap();
        let p = postings.iter().find(|p| p.id == id).unwrap();
        assert_eq!(p.qtd_pessoas, 1);
    }

    #[tokio::test]
    async fn postings_without_author_are_invisible() {
        let state = test_state().await;
        register_author(&state, "a@b.com").await;
        create(&state, posting_request("Horta", "100", "a@b.com")).await;

        crate::api::accounts::delete_account(State(state.clone()), Path("a@b.com".to_string()))
            .await
            .unwrap();

        let Json(postings) = list_postings(State(state)).await.unwrap();
        assert!(postings.is_empty());
    }

    #[tokio::test]
    async fn update_changes_only_the_mutable_fields() {
        let state = test_state().await;
        register_author(&state, "a@b.com").await;
        let id = create(
            &state,
            posting_request("Horta Comunitária", "1.500,50", "a@b.com"),
        )
        .await;

        update_posting(
            State(state.clone()),
            Path(id),
            Json(UpdatePostingRequest {
                valor: Some("2000".to_string()),
                numero_pessoas: Some("5".to_string()),
                telefone: Some("(11)99999-0000".to_string()),
                nome: None,
                descricao: None,
            }),
        )
        .await
        .unwrap();

        let Json(postings) = list_postings(State(state)).await.unwrap();
        let p = postings.iter().find(|p| p.id == id).unwrap();
        assert_eq!(p.valor, 2000.0);
        assert_eq!(p.qtd_pessoas, 5);
        assert_eq!(p.telefone, "(11)99999-0000");
        // Name and description untouched
        assert_eq!(p.nome_projeto, "Horta Comunitária");
        assert_eq!(p.descricao, "Uma horta no bairro");
    }

    #[tokio::test]
    async fn update_confirms_name_and_description_when_provided() {
        let state = test_state().await;
        register_author(&state, "a@b.com").await;
        let id = create(&state, posting_request("Horta", "100", "a@b.com")).await;

        update_posting(
            State(state.clone()),
            Path(id),
            Json(UpdatePostingRequest {
                valor: Some("100".to_string()),
                numero_pessoas: None,
                telefone: Some("(11)98888-7777".to_string()),
                nome: Some("Horta Vertical".to_string()),
                descricao: Some("Com canteiros suspensos".to_string()),
            }),
        )
        .await
        .unwrap();

        let Json(postings) = list_postings(State(state)).await.unwrap();
        let p = postings.iter().find(|p| p.id == id).unwrap();
        assert_eq!(p.nome_projeto, "Horta Vertical");
        assert_eq!(p.descricao, "Com canteiros suspensos");
    }

    #[tokio::test]
    async fn update_requires_valor_and_telefone() {
        let state = test_state().await;
        register_author(&state, "a@b.com").await;
        let id = create(&state, posting_request("Horta", "100", "a@b.com")).await;

        let err = update_posting(
            State(state),
            Path(id),
            Json(UpdatePostingRequest {
                valor: None,
                numero_pessoas: Some("2".to_string()),
                telefone: None,
                nome: None,
                descricao: None,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_missing_posting_is_not_found() {
        let state = test_state().await;

        let err = update_posting(
            State(state),
            Path(9999),
            Json(UpdatePostingRequest {
                valor: Some("10".to_string()),
                numero_pessoas: None,
                telefone: Some("(11)98888-7777".to_string()),
                nome: None,
                descricao: None,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_posting_and_second_delete_fails() {
        let state = test_state().await;
        register_author(&state, "a@b.com").await;
        let id = create(&state, posting_request("Horta", "100", "a@b.com")).await;

        delete_posting(State(state.clone()), Path(id)).await.unwrap();

        let Json(postings) = list_postings(State(state.clone())).await.unwrap();
        assert!(postings.iter().all(|p| p.id != id));

        let err = delete_posting(State(state), Path(id)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
