use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::auth::AdminSession;
use crate::axum_http::error_responses::AppError;
use crate::backend_api::BackendClient;
use crate::backend_api::promo_codes::{
    CreatePromoCodeRequest, PromoCodeListItem, PromoCodeListResponse, UpdatePromoCodeRequest,
};
use crate::cache::QueryCache;
use crate::usecases::promo_codes::{PromoCodesGateway, PromoCodesUseCase};

#[derive(Debug, Deserialize)]
pub struct PromoPageQuery {
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
    let promo_codes_usecase = PromoCodesUseCase::new(client, cache);

    Router::new()
        .route("/", get(list_promo_codes).post(create_promo_code))
        .route(
            "/:promo_id",
            axum::routing::patch(update_promo_code).delete(delete_promo_code),
        )
        .with_state(Arc::new(promo_codes_usecase))
}

pub async fn list_promo_codes<G>(
    State(promo_codes_usecase): State<Arc<PromoCodesUseCase<G>>>,
    _session: AdminSession,
    Query(query): Query<PromoPageQuery>,
) -> Result<Json<PromoCodeListResponse>, AppError>
where
    G: PromoCodesGateway + Send + Sync + 'static,
{
    let response = promo_codes_usecase
        .list_promo_codes(query.page, query.page_size)
        .await?;
    Ok(Json(response))
}

pub async fn create_promo_code<G>(
    State(promo_codes_usecase): State<Arc<PromoCodesUseCase<G>>>,
    _session: AdminSession,
    Json(request): Json<CreatePromoCodeRequest>,
) -> Result<(StatusCode, Json<PromoCodeListItem>), AppError>
where
    G: PromoCodesGateway + Send + Sync + 'static,
{
    if request.code.trim().is_empty() {
        return Err(AppError::BadRequest("promo code is empty".to_string()));
    }
    if !(1..=100).contains(&request.discount_percent) {
        return Err(AppError::BadRequest(
            "discount must be between 1 and 100 percent".to_string(),
        ));
    }

    let created = promo_codes_usecase.create_promo_code(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_promo_code<G>(
    State(promo_codes_usecase): State<Arc<PromoCodesUseCase<G>>>,
    _session: AdminSession,
    Path(promo_id): Path<i64>,
    Query(query): Query<PromoPageQuery>,
    Json(request): Json<UpdatePromoCodeRequest>,
) -> Result<Json<PromoCodeListResponse>, AppError>
where
    G: PromoCodesGateway + Send + Sync + 'static,
{
    promo_codes_usecase
        .update_promo_code(promo_id, &request)
        .await?;
    // Refetch the page the caller was viewing, not the first one.
    let response = promo_codes_usecase
        .list_promo_codes(query.page, query.page_size)
        .await?;
    Ok(Json(response))
}

pub async fn delete_promo_code<G>(
    State(promo_codes_usecase): State<Arc<PromoCodesUseCase<G>>>,
    _session: AdminSession,
    Path(promo_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    G: PromoCodesGateway + Send + Sync + 'static,
{
    promo_codes_usecase.delete_promo_code(promo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::usecases::promo_codes::MockPromoCodesGateway;
    use std::time::Duration;

    #[tokio::test]
    async fn test_update_refetches_the_page_the_caller_was_viewing() {
        let mut gateway = MockPromoCodesGateway::new();
        gateway
            .expect_update_promo_code()
            .times(1)
            .returning(|_, _| Ok(()));
        gateway
            .expect_list_promo_codes()
            .withf(|page, page_size| *page == 3 && *page_size == 50)
            .times(1)
            .returning(|page, page_size| {
                Ok(PromoCodeListResponse {
                    items: vec![],
                    total: 0,
                    page,
                    page_size,
                })
            });

        let usecase = Arc::new(PromoCodesUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        ));

        let response = update_promo_code(
            State(usecase),
            AdminSession {
                token: "token".to_string(),
            },
            Path(7),
            Query(PromoPageQuery {
                page: 3,
                page_size: 50,
            }),
            Json(UpdatePromoCodeRequest {
                is_active: Some(false),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.page, 3);
        assert_eq!(response.0.page_size, 50);
    }
}
