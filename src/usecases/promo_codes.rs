use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::backend_api::promo_codes::{
    CreatePromoCodeRequest, PromoCodeListItem, PromoCodeListResponse, UpdatePromoCodeRequest,
};
use crate::backend_api::{self, ApiError, BackendClient};
use crate::cache::invalidation::resources;
use crate::cache::{AdminMutation, CacheKey, QueryCache};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromoCodesGateway: Send + Sync {
    async fn list_promo_codes(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<PromoCodeListResponse, ApiError>;

    async fn create_promo_code(
        &self,
        request: &CreatePromoCodeRequest,
    ) -> Result<PromoCodeListItem, ApiError>;

    async fn update_promo_code(
        &self,
        promo_id: i64,
        request: &UpdatePromoCodeRequest,
    ) -> Result<(), ApiError>;

    async fn delete_promo_code(&self, promo_id: i64) -> Result<(), ApiError>;
}

#[async_trait]
impl PromoCodesGateway for BackendClient {
    async fn list_promo_codes(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<PromoCodeListResponse, ApiError> {
        backend_api::promo_codes::list_promo_codes(self, page, page_size).await
    }

    async fn create_promo_code(
        &self,
        request: &CreatePromoCodeRequest,
    ) -> Result<PromoCodeListItem, ApiError> {
        backend_api::promo_codes::create_promo_code(self, request).await
    }

    async fn update_promo_code(
        &self,
        promo_id: i64,
        request: &UpdatePromoCodeRequest,
    ) -> Result<(), ApiError> {
        backend_api::promo_codes::update_promo_code(self, promo_id, request).await
    }

    async fn delete_promo_code(&self, promo_id: i64) -> Result<(), ApiError> {
        backend_api::promo_codes::delete_promo_code(self, promo_id).await
    }
}

pub struct PromoCodesUseCase<G>
where
    G: PromoCodesGateway + Send + Sync + 'static,
{
    gateway: Arc<G>,
    cache: Arc<QueryCache>,
}

impl<G> PromoCodesUseCase<G>
where
    G: PromoCodesGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list_promo_codes(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<PromoCodeListResponse, ApiError> {
        info!(page, page_size, "promo codes: listing");
        let key = CacheKey::list(
            resources::PROMO_CODES,
            &serde_json::json!({ "page": page, "page_size": page_size }),
        );
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.list_promo_codes(page, page_size).await }
            })
            .await
    }

    pub async fn create_promo_code(
        &self,
        request: &CreatePromoCodeRequest,
    ) -> Result<PromoCodeListItem, ApiError> {
        info!(code = %request.code, discount_percent = request.discount_percent, "promo codes: creating");
        let created = self.gateway.create_promo_code(request).await.map_err(|err| {
            error!(code = %request.code, error = %err, "promo codes: create failed");
            err
        })?;
        self.cache.invalidate(&AdminMutation::CreatePromoCode);
        Ok(created)
    }

    pub async fn update_promo_code(
        &self,
        promo_id: i64,
        request: &UpdatePromoCodeRequest,
    ) -> Result<(), ApiError> {
        info!(promo_id, "promo codes: updating");
        self.gateway
            .update_promo_code(promo_id, request)
            .await
            .map_err(|err| {
                error!(promo_id, error = %err, "promo codes: update failed");
                err
            })?;
        self.cache
            .invalidate(&AdminMutation::UpdatePromoCode { promo_id });
        Ok(())
    }

    pub async fn delete_promo_code(&self, promo_id: i64) -> Result<(), ApiError> {
        info!(promo_id, "promo codes: deleting");
        self.gateway.delete_promo_code(promo_id).await.map_err(|err| {
            error!(promo_id, error = %err, "promo codes: delete failed");
            err
        })?;
        self.cache
            .invalidate(&AdminMutation::DeletePromoCode { promo_id });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::time::Duration;

    fn item_from(request: &CreatePromoCodeRequest, id: i64) -> PromoCodeListItem {
        PromoCodeListItem {
            id,
            code: request.code.clone(),
            discount_percent: request.discount_percent,
            valid_from: Utc::now(),
            valid_until: request.valid_until,
            max_uses: request.max_uses,
            current_uses: 0,
            partner_id: request.partner_id,
            partner_commission_percent: request.partner_commission_percent,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_created_code_appears_in_the_next_list_read() {
        // The mock keeps list state so the test exercises the full
        // create -> invalidate -> refetch sequence.
        let store: Arc<Mutex<Vec<PromoCodeListItem>>> = Arc::new(Mutex::new(vec![]));

        let mut gateway = MockPromoCodesGateway::new();
        let list_store = Arc::clone(&store);
        gateway
            .expect_list_promo_codes()
            .times(2)
            .returning(move |page, page_size| {
                let items = list_store.lock().unwrap().clone();
                Ok(PromoCodeListResponse {
                    total: items.len() as i64,
                    items,
                    page,
                    page_size,
                })
            });
        let create_store = Arc::clone(&store);
        gateway
            .expect_create_promo_code()
            .times(1)
            .returning(move |request| {
                let created = item_from(request, 1);
                create_store.lock().unwrap().push(created.clone());
                Ok(created)
            });

        let usecase = PromoCodesUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        );

        let before = usecase.list_promo_codes(1, 20).await.unwrap();
        assert!(before.items.is_empty());

        usecase
            .create_promo_code(&CreatePromoCodeRequest {
                code: "PROMO2024".to_string(),
                discount_percent: 20,
                valid_until: None,
                max_uses: None,
                partner_id: None,
                partner_commission_percent: None,
            })
            .await
            .unwrap();

        let after = usecase.list_promo_codes(1, 20).await.unwrap();
        assert_eq!(after.items.len(), 1);
        assert_eq!(after.items[0].code, "PROMO2024");
        assert_eq!(after.items[0].discount_percent, 20);
    }

    #[tokio::test]
    async fn test_duplicate_code_error_leaves_the_list_cached() {
        let mut gateway = MockPromoCodesGateway::new();
        gateway
            .expect_list_promo_codes()
            .times(1)
            .returning(|page, page_size| {
                Ok(PromoCodeListResponse {
                    items: vec![],
                    total: 0,
                    page,
                    page_size,
                })
            });
        gateway.expect_create_promo_code().times(1).returning(|_| {
            Err(ApiError::Http {
                status: 409,
                message: "Promo code already exists".to_string(),
            })
        });

        let usecase = PromoCodesUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        );

        usecase.list_promo_codes(1, 20).await.unwrap();
        let err = usecase
            .create_promo_code(&CreatePromoCodeRequest {
                code: "PROMO2024".to_string(),
                discount_percent: 20,
                valid_until: None,
                max_uses: None,
                partner_id: None,
                partner_commission_percent: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));

        // Cached; the mock only allows one list call.
        usecase.list_promo_codes(1, 20).await.unwrap();
    }

    #[tokio::test]
    async fn test_deactivation_invalidates_the_list() {
        let mut gateway = MockPromoCodesGateway::new();
        gateway
            .expect_list_promo_codes()
            .times(2)
            .returning(|page, page_size| {
                Ok(PromoCodeListResponse {
                    items: vec![],
                    total: 0,
                    page,
                    page_size,
                })
            });
        gateway
            .expect_update_promo_code()
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = PromoCodesUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        );

        usecase.list_promo_codes(1, 20).await.unwrap();
        usecase
            .update_promo_code(
                3,
                &UpdatePromoCodeRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        usecase.list_promo_codes(1, 20).await.unwrap();
    }
}
