use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::auth::AdminSession;
use crate::axum_http::error_responses::AppError;
use crate::backend_api::BackendClient;
use crate::backend_api::content::{
    HoroscopeContentItem, HoroscopeContentListResponse, UpdateHoroscopeContentRequest,
};
use crate::cache::QueryCache;
use crate::usecases::content::{ContentGateway, ContentUseCase};

pub fn routes(client: Arc<BackendClient>, cache: Arc<QueryCache>) -> Router {
    let content_usecase = ContentUseCase::new(client, cache);

    Router::new()
        .route("/horoscopes", get(list_horoscope_content))
        .route(
            "/horoscopes/:zodiac_sign",
            get(get_horoscope_content).put(update_horoscope_content),
        )
        .with_state(Arc::new(content_usecase))
}

pub async fn list_horoscope_content<G>(
    State(content_usecase): State<Arc<ContentUseCase<G>>>,
    _session: AdminSession,
) -> Result<Json<HoroscopeContentListResponse>, AppError>
where
    G: ContentGateway + Send + Sync + 'static,
{
    let response = content_usecase.list_horoscope_content().await?;
    Ok(Json(response))
}

pub async fn get_horoscope_content<G>(
    State(content_usecase): State<Arc<ContentUseCase<G>>>,
    _session: AdminSession,
    Path(zodiac_sign): Path<String>,
) -> Result<Json<HoroscopeContentItem>, AppError>
where
    G: ContentGateway + Send + Sync + 'static,
{
    let item = content_usecase.get_horoscope_content(&zodiac_sign).await?;
    Ok(Json(item))
}

pub async fn update_horoscope_content<G>(
    State(content_usecase): State<Arc<ContentUseCase<G>>>,
    _session: AdminSession,
    Path(zodiac_sign): Path<String>,
    Json(request): Json<UpdateHoroscopeContentRequest>,
) -> Result<Json<HoroscopeContentItem>, AppError>
where
    G: ContentGateway + Send + Sync + 'static,
{
    if request.base_text.trim().is_empty() {
        return Err(AppError::BadRequest(
            "horoscope text cannot be empty".to_string(),
        ));
    }

    let saved = content_usecase
        .update_horoscope_content(&zodiac_sign, &request)
        .await?;
    Ok(Json(saved))
}
