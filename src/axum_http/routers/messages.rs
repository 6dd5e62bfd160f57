use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::AdminSession;
use crate::axum_http::error_responses::AppError;
use crate::backend_api::BackendClient;
use crate::backend_api::messages::{
    MessageHistoryResponse, SendMessageRequest, SendMessageResponse,
};
use crate::cache::QueryCache;
use crate::usecases::messages::{MessagesGateway, MessagesUseCase};

/// Compose form as the console submits it. `broadcast` picks which half of
/// the targeting fields survives into the backend request.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageForm {
    pub text: String,
    pub broadcast: bool,
    pub target_user_id: Option<i64>,
    pub filters: Option<serde_json::Value>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryPageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

pub fn routes(client: Arc<BackendClient>, cache: Arc<QueryCache>) -> Router {
    let messages_usecase = MessagesUseCase::new(client, cache);

    Router::new()
        .route("/", get(message_history).post(send_message))
        .route("/:message_id", axum::routing::delete(cancel_message))
        .with_state(Arc::new(messages_usecase))
}

fn build_send_request(form: SendMessageForm) -> Result<SendMessageRequest, AppError> {
    if form.text.trim().is_empty() {
        return Err(AppError::BadRequest("message text is empty".to_string()));
    }

    if form.broadcast {
        Ok(SendMessageRequest {
            text: form.text,
            target_user_id: None,
            filters: form.filters,
            scheduled_at: form.scheduled_at,
        })
    } else {
        let target_user_id = form
            .target_user_id
            .ok_or_else(|| AppError::BadRequest("target user is required".to_string()))?;
        Ok(SendMessageRequest {
            text: form.text,
            target_user_id: Some(target_user_id),
            filters: None,
            scheduled_at: form.scheduled_at,
        })
    }
}

pub async fn send_message<G>(
    State(messages_usecase): State<Arc<MessagesUseCase<G>>>,
    _session: AdminSession,
    Json(form): Json<SendMessageForm>,
) -> Result<Json<SendMessageResponse>, AppError>
where
    G: MessagesGateway + Send + Sync + 'static,
{
    let request = build_send_request(form)?;
    let response = messages_usecase.send_message(&request).await?;
    Ok(Json(response))
}

pub async fn message_history<G>(
    State(messages_usecase): State<Arc<MessagesUseCase<G>>>,
    _session: AdminSession,
    Query(query): Query<HistoryPageQuery>,
) -> Result<Json<MessageHistoryResponse>, AppError>
where
    G: MessagesGateway + Send + Sync + 'static,
{
    let response = messages_usecase
        .message_history(query.page, query.page_size)
        .await?;
    Ok(Json(response))
}

pub async fn cancel_message<G>(
    State(messages_usecase): State<Arc<MessagesUseCase<G>>>,
    _session: AdminSession,
    Path(message_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    G: MessagesGateway + Send + Sync + 'static,
{
    messages_usecase.cancel_message(message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
