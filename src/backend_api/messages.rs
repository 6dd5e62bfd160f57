use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, BackendClient};

/// Either a broadcast (audience described by `filters`) or a single-user
/// message (`target_user_id` set); the two are mutually exclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMessageRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMessageResponse {
    pub message_id: i64,
    pub status: String,
    pub recipients_count: i64,
}

/// Status progresses pending -> sending -> sent/canceled, driven by the
/// backend; the console only displays it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageHistoryItem {
    pub id: i64,
    pub text: String,
    pub filters: serde_json::Value,
    pub target_user_id: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub total_recipients: i64,
    pub delivered_count: i64,
    pub failed_count: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageHistoryResponse {
    pub items: Vec<MessageHistoryItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct HistoryQuery {
    page: i64,
    page_size: i64,
}

pub async fn send_message(
    client: &BackendClient,
    request: &SendMessageRequest,
) -> Result<SendMessageResponse, ApiError> {
    client.post("/messages", request, "send message").await
}

pub async fn message_history(
    client: &BackendClient,
    page: i64,
    page_size: i64,
) -> Result<MessageHistoryResponse, ApiError> {
    client
        .get_with_query("/messages", &HistoryQuery { page, page_size }, "message history")
        .await
}

pub async fn cancel_message(client: &BackendClient, message_id: i64) -> Result<(), ApiError> {
    client
        .delete_unit(&format!("/messages/{}", message_id), "cancel message")
        .await
}
