use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, BackendClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromoCodeListItem {
    pub id: i64,
    pub code: String,
    pub discount_percent: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
    pub max_uses: Option<i32>,
    /// Server-computed; never edited from the console.
    pub current_uses: i32,
    pub partner_id: Option<i64>,
    pub partner_commission_percent: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromoCodeListResponse {
    pub items: Vec<PromoCodeListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePromoCodeRequest {
    pub code: String,
    pub discount_percent: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_commission_percent: Option<i32>,
}

/// Partial update; only the provided fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdatePromoCodeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct PageQuery {
    page: i64,
    page_size: i64,
}

pub async fn list_promo_codes(
    client: &BackendClient,
    page: i64,
    page_size: i64,
) -> Result<PromoCodeListResponse, ApiError> {
    client
        .get_with_query("/promo-codes", &PageQuery { page, page_size }, "list promo codes")
        .await
}

pub async fn create_promo_code(
    client: &BackendClient,
    request: &CreatePromoCodeRequest,
) -> Result<PromoCodeListItem, ApiError> {
    client.post("/promo-codes", request, "create promo code").await
}

pub async fn update_promo_code(
    client: &BackendClient,
    promo_id: i64,
    request: &UpdatePromoCodeRequest,
) -> Result<(), ApiError> {
    client
        .patch_unit(&format!("/promo-codes/{}", promo_id), request, "update promo code")
        .await
}

pub async fn delete_promo_code(client: &BackendClient, promo_id: i64) -> Result<(), ApiError> {
    client
        .delete_unit(&format!("/promo-codes/{}", promo_id), "delete promo code")
        .await
}
