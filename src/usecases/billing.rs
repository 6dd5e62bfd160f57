use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::backend_api::billing::{
    PaymentListFilter, PaymentListResponse, SubscriptionListFilter, SubscriptionListResponse,
    UpdateSubscriptionStatusRequest,
};
use crate::backend_api::{self, ApiError, BackendClient};
use crate::cache::invalidation::resources;
use crate::cache::{AdminMutation, CacheKey, QueryCache};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingGateway: Send + Sync {
    async fn list_payments(
        &self,
        filter: &PaymentListFilter,
    ) -> Result<PaymentListResponse, ApiError>;

    async fn list_subscriptions(
        &self,
        filter: &SubscriptionListFilter,
    ) -> Result<SubscriptionListResponse, ApiError>;

    async fn update_subscription_status(
        &self,
        subscription_id: i64,
        request: &UpdateSubscriptionStatusRequest,
    ) -> Result<(), ApiError>;
}

#[async_trait]
impl BillingGateway for BackendClient {
    async fn list_payments(
        &self,
        filter: &PaymentListFilter,
    ) -> Result<PaymentListResponse, ApiError> {
        backend_api::billing::list_payments(self, filter).await
    }

    async fn list_subscriptions(
        &self,
        filter: &SubscriptionListFilter,
    ) -> Result<SubscriptionListResponse, ApiError> {
        backend_api::billing::list_subscriptions(self, filter).await
    }

    async fn update_subscription_status(
        &self,
        subscription_id: i64,
        request: &UpdateSubscriptionStatusRequest,
    ) -> Result<(), ApiError> {
        backend_api::billing::update_subscription_status(self, subscription_id, request).await
    }
}

pub struct BillingUseCase<G>
where
    G: BillingGateway + Send + Sync + 'static,
{
    gateway: Arc<G>,
    cache: Arc<QueryCache>,
}

impl<G> BillingUseCase<G>
where
    G: BillingGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list_payments(
        &self,
        filter: &PaymentListFilter,
    ) -> Result<PaymentListResponse, ApiError> {
        info!(?filter, "billing: listing payments");
        let key = CacheKey::list(resources::PAYMENTS, filter);
        let gateway = Arc::clone(&self.gateway);
        let filter = filter.clone();
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                let filter = filter.clone();
                async move { gateway.list_payments(&filter).await }
            })
            .await
    }

    pub async fn list_subscriptions(
        &self,
        filter: &SubscriptionListFilter,
    ) -> Result<SubscriptionListResponse, ApiError> {
        info!(?filter, "billing: listing subscriptions");
        let key = CacheKey::list(resources::SUBSCRIPTIONS, filter);
        let gateway = Arc::clone(&self.gateway);
        let filter = filter.clone();
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                let filter = filter.clone();
                async move { gateway.list_subscriptions(&filter).await }
            })
            .await
    }

    pub async fn update_subscription_status(
        &self,
        subscription_id: i64,
        status: String,
    ) -> Result<(), ApiError> {
        info!(subscription_id, status = %status, "billing: requesting status transition");
        self.gateway
            .update_subscription_status(
                subscription_id,
                &UpdateSubscriptionStatusRequest { status },
            )
            .await
            .map_err(|err| {
                error!(subscription_id, error = %err, "billing: status transition failed");
                err
            })?;
        self.cache
            .invalidate(&AdminMutation::UpdateSubscriptionStatus { subscription_id });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_subscriptions() -> SubscriptionListResponse {
        SubscriptionListResponse {
            items: vec![],
            total: 0,
            page: 1,
            page_size: 20,
        }
    }

    #[tokio::test]
    async fn test_status_transition_invalidates_subscription_list() {
        let mut gateway = MockBillingGateway::new();
        gateway
            .expect_list_subscriptions()
            .times(2)
            .returning(|_| Ok(sample_subscriptions()));
        gateway
            .expect_update_subscription_status()
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = BillingUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        );
        let filter = SubscriptionListFilter::default();

        usecase.list_subscriptions(&filter).await.unwrap();
        usecase
            .update_subscription_status(5, "canceled".to_string())
            .await
            .unwrap();
        usecase.list_subscriptions(&filter).await.unwrap();
    }

    #[tokio::test]
    async fn test_payment_list_totals_pass_through_verbatim() {
        let mut gateway = MockBillingGateway::new();
        gateway.expect_list_payments().times(1).returning(|_| {
            Ok(PaymentListResponse {
                items: vec![],
                total: 12,
                page: 1,
                page_size: 20,
                total_amount: 123_400,
            })
        });

        let usecase = BillingUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        );

        let response = usecase
            .list_payments(&PaymentListFilter::default())
            .await
            .unwrap();
        assert_eq!(response.total, 12);
        assert_eq!(response.total_amount, 123_400);
    }
}
