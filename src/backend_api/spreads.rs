use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, BackendClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TarotSpreadListItem {
    pub id: i64,
    pub user_id: i64,
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub spread_type: String,
    pub question: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TarotSpreadListResponse {
    pub items: Vec<TarotSpreadListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardPosition {
    pub position: i32,
    pub position_name: String,
    pub card_name: String,
    pub is_reversed: bool,
}

/// Immutable historical record; the console only reads spreads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TarotSpreadDetail {
    pub id: i64,
    pub user_id: i64,
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub spread_type: String,
    pub question: String,
    pub cards: Vec<CardPosition>,
    pub interpretation: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SpreadListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

pub async fn list_spreads(
    client: &BackendClient,
    filter: &SpreadListFilter,
) -> Result<TarotSpreadListResponse, ApiError> {
    client
        .get_with_query("/tarot-spreads", filter, "list tarot spreads")
        .await
}

pub async fn get_spread(
    client: &BackendClient,
    spread_id: i64,
) -> Result<TarotSpreadDetail, ApiError> {
    client
        .get(&format!("/tarot-spreads/{}", spread_id), "get tarot spread")
        .await
}
