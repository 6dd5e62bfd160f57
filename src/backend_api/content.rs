use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, BackendClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoroscopeContentItem {
    pub id: i64,
    pub zodiac_sign: String,
    pub base_text: String,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoroscopeContentListResponse {
    pub items: Vec<HoroscopeContentItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateHoroscopeContentRequest {
    pub base_text: String,
    pub notes: Option<String>,
}

pub async fn list_horoscope_content(
    client: &BackendClient,
) -> Result<HoroscopeContentListResponse, ApiError> {
    client
        .get("/content/horoscopes", "list horoscope content")
        .await
}

pub async fn get_horoscope_content(
    client: &BackendClient,
    zodiac_sign: &str,
) -> Result<HoroscopeContentItem, ApiError> {
    client
        .get(
            &format!("/content/horoscopes/{}", zodiac_sign),
            "get horoscope content",
        )
        .await
}

pub async fn update_horoscope_content(
    client: &BackendClient,
    zodiac_sign: &str,
    request: &UpdateHoroscopeContentRequest,
) -> Result<HoroscopeContentItem, ApiError> {
    client
        .put(
            &format!("/content/horoscopes/{}", zodiac_sign),
            request,
            "update horoscope content",
        )
        .await
}
