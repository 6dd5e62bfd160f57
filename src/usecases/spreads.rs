use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::backend_api::spreads::{SpreadListFilter, TarotSpreadDetail, TarotSpreadListResponse};
use crate::backend_api::{self, ApiError, BackendClient};
use crate::cache::invalidation::resources;
use crate::cache::{CacheKey, QueryCache};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpreadsGateway: Send + Sync {
    async fn list_spreads(
        &self,
        filter: &SpreadListFilter,
    ) -> Result<TarotSpreadListResponse, ApiError>;

    async fn get_spread(&self, spread_id: i64) -> Result<TarotSpreadDetail, ApiError>;
}

#[async_trait]
impl SpreadsGateway for BackendClient {
    async fn list_spreads(
        &self,
        filter: &SpreadListFilter,
    ) -> Result<TarotSpreadListResponse, ApiError> {
        backend_api::spreads::list_spreads(self, filter).await
    }

    async fn get_spread(&self, spread_id: i64) -> Result<TarotSpreadDetail, ApiError> {
        backend_api::spreads::get_spread(self, spread_id).await
    }
}

/// Read-only browsing of tarot spread history; there are no mutations here,
/// so nothing ever invalidates these keys except TTL expiry.
pub struct SpreadsUseCase<G>
where
    G: SpreadsGateway + Send + Sync + 'static,
{
    gateway: Arc<G>,
    cache: Arc<QueryCache>,
}

impl<G> SpreadsUseCase<G>
where
    G: SpreadsGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list_spreads(
        &self,
        filter: &SpreadListFilter,
    ) -> Result<TarotSpreadListResponse, ApiError> {
        info!(?filter, "spreads: listing tarot spreads");
        let key = CacheKey::list(resources::SPREADS, filter);
        let gateway = Arc::clone(&self.gateway);
        let filter = filter.clone();
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                let filter = filter.clone();
                async move { gateway.list_spreads(&filter).await }
            })
            .await
    }

    pub async fn get_spread(&self, spread_id: i64) -> Result<TarotSpreadDetail, ApiError> {
        info!(spread_id, "spreads: loading spread detail");
        let key = CacheKey::entity(resources::SPREAD, spread_id);
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.get_spread(spread_id).await }
            })
            .await
    }
}
