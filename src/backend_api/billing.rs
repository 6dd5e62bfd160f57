use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, BackendClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentListItem {
    pub id: String,
    pub user_id: i64,
    pub subscription_id: Option<i64>,
    /// Minor currency units; display requires a divide-by-100 step.
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub is_recurring: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub user_telegram_id: Option<i64>,
    pub user_username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentListResponse {
    pub items: Vec<PaymentListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    /// Backend-computed sum over the filtered set, in minor units.
    pub total_amount: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionListItem {
    pub id: i64,
    pub user_id: i64,
    pub plan: String,
    pub status: String,
    pub payment_method_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub user_telegram_id: Option<i64>,
    pub user_username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionListResponse {
    pub items: Vec<SubscriptionListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateSubscriptionStatusRequest {
    pub status: String,
}

pub async fn list_payments(
    client: &BackendClient,
    filter: &PaymentListFilter,
) -> Result<PaymentListResponse, ApiError> {
    client
        .get_with_query("/payments", filter, "list payments")
        .await
}

pub async fn list_subscriptions(
    client: &BackendClient,
    filter: &SubscriptionListFilter,
) -> Result<SubscriptionListResponse, ApiError> {
    client
        .get_with_query("/subscriptions", filter, "list subscriptions")
        .await
}

/// Requests a status transition; the lifecycle itself is backend-owned.
pub async fn update_subscription_status(
    client: &BackendClient,
    subscription_id: i64,
    request: &UpdateSubscriptionStatusRequest,
) -> Result<(), ApiError> {
    client
        .patch_unit(
            &format!("/subscriptions/{}", subscription_id),
            request,
            "update subscription status",
        )
        .await
}
