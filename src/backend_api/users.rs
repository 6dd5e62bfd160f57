use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, BackendClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserListItem {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub zodiac_sign: Option<String>,
    pub is_premium: bool,
    pub premium_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub tarot_spread_count: i64,
    pub daily_spread_limit: i32,
    pub detailed_natal_purchased_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserListResponse {
    pub items: Vec<UserListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub pages: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// List filter passed through verbatim; pagination, search and sorting are
/// all backend-computed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zodiac_sign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_detailed_natal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentHistoryItem {
    pub id: String,
    pub amount: i64,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionInfo {
    pub id: i64,
    pub plan: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TarotSpreadHistoryItem {
    pub id: i64,
    pub spread_type: String,
    pub question: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDetail {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub birth_date: Option<String>,
    pub zodiac_sign: Option<String>,
    pub birth_time: Option<String>,
    pub birth_city: Option<String>,
    pub timezone: Option<String>,
    pub notifications_enabled: bool,
    pub notification_hour: Option<i32>,
    pub is_premium: bool,
    pub premium_until: Option<DateTime<Utc>>,
    pub daily_spread_limit: i32,
    pub tarot_spread_count: i64,
    pub detailed_natal_purchased_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub subscription: Option<SubscriptionInfo>,
    pub payments: Vec<PaymentHistoryItem>,
    pub recent_spreads: Vec<TarotSpreadHistoryItem>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionAction {
    Activate,
    Cancel,
    Extend,
}

impl Display for SubscriptionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            SubscriptionAction::Activate => "activate",
            SubscriptionAction::Cancel => "cancel",
            SubscriptionAction::Extend => "extend",
        };
        write!(f, "{}", action)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateSubscriptionRequest {
    pub action: SubscriptionAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum GiftType {
    PremiumDays,
    DetailedNatal,
    TarotSpreads,
}

impl Display for GiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let gift_type = match self {
            GiftType::PremiumDays => "premium_days",
            GiftType::DetailedNatal => "detailed_natal",
            GiftType::TarotSpreads => "tarot_spreads",
        };
        write!(f, "{}", gift_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GiftRequest {
    pub gift_type: GiftType,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    ActivatePremium,
    CancelPremium,
    Ban,
    Unban,
    GiftSpreads,
}

impl Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            BulkAction::ActivatePremium => "activate_premium",
            BulkAction::CancelPremium => "cancel_premium",
            BulkAction::Ban => "ban",
            BulkAction::Unban => "unban",
            BulkAction::GiftSpreads => "gift_spreads",
        };
        write!(f, "{}", action)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkActionRequest {
    pub user_ids: Vec<i64>,
    pub action: BulkAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

/// Per-item outcome counts, computed by the backend and displayed verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkActionResponse {
    pub success_count: i64,
    pub failed_count: i64,
    pub errors: Vec<String>,
}

pub async fn list_users(
    client: &BackendClient,
    filter: &UserListFilter,
) -> Result<UserListResponse, ApiError> {
    client.get_with_query("/users", filter, "list users").await
}

pub async fn get_user(client: &BackendClient, user_id: i64) -> Result<UserDetail, ApiError> {
    client
        .get(&format!("/users/{}", user_id), "get user detail")
        .await
}

pub async fn update_subscription(
    client: &BackendClient,
    user_id: i64,
    request: &UpdateSubscriptionRequest,
) -> Result<(), ApiError> {
    client
        .patch_unit(
            &format!("/users/{}/subscription", user_id),
            request,
            "update user subscription",
        )
        .await
}

pub async fn gift_user(
    client: &BackendClient,
    user_id: i64,
    request: &GiftRequest,
) -> Result<(), ApiError> {
    client
        .post_unit(&format!("/users/{}/gift", user_id), request, "gift user")
        .await
}

pub async fn bulk_action(
    client: &BackendClient,
    request: &BulkActionRequest,
) -> Result<BulkActionResponse, ApiError> {
    client.post("/users/bulk", request, "bulk user action").await
}
