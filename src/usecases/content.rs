use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::backend_api::content::{
    HoroscopeContentItem, HoroscopeContentListResponse, UpdateHoroscopeContentRequest,
};
use crate::backend_api::{self, ApiError, BackendClient};
use crate::cache::invalidation::resources;
use crate::cache::{AdminMutation, CacheKey, QueryCache};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGateway: Send + Sync {
    async fn list_horoscope_content(&self) -> Result<HoroscopeContentListResponse, ApiError>;

    async fn get_horoscope_content(
        &self,
        zodiac_sign: &str,
    ) -> Result<HoroscopeContentItem, ApiError>;

    async fn update_horoscope_content(
        &self,
        zodiac_sign: &str,
        request: &UpdateHoroscopeContentRequest,
    ) -> Result<HoroscopeContentItem, ApiError>;
}

#[async_trait]
impl ContentGateway for BackendClient {
    async fn list_horoscope_content(&self) -> Result<HoroscopeContentListResponse, ApiError> {
        backend_api::content::list_horoscope_content(self).await
    }

    async fn get_horoscope_content(
        &self,
        zodiac_sign: &str,
    ) -> Result<HoroscopeContentItem, ApiError> {
        backend_api::content::get_horoscope_content(self, zodiac_sign).await
    }

    async fn update_horoscope_content(
        &self,
        zodiac_sign: &str,
        request: &UpdateHoroscopeContentRequest,
    ) -> Result<HoroscopeContentItem, ApiError> {
        backend_api::content::update_horoscope_content(self, zodiac_sign, request).await
    }
}

pub struct ContentUseCase<G>
where
    G: ContentGateway + Send + Sync + 'static,
{
    gateway: Arc<G>,
    cache: Arc<QueryCache>,
}

impl<G> ContentUseCase<G>
where
    G: ContentGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list_horoscope_content(&self) -> Result<HoroscopeContentListResponse, ApiError> {
        info!("content: listing horoscope templates");
        let key = CacheKey::bare(resources::HOROSCOPES);
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.list_horoscope_content().await }
            })
            .await
    }

    pub async fn get_horoscope_content(
        &self,
        zodiac_sign: &str,
    ) -> Result<HoroscopeContentItem, ApiError> {
        info!(zodiac_sign, "content: loading horoscope template");
        let key = CacheKey::entity(resources::HOROSCOPE, zodiac_sign);
        let gateway = Arc::clone(&self.gateway);
        let zodiac_sign = zodiac_sign.to_string();
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                let zodiac_sign = zodiac_sign.clone();
                async move { gateway.get_horoscope_content(&zodiac_sign).await }
            })
            .await
    }

    /// Updates a sign's template and returns the saved item as the backend
    /// stored it, not as the console submitted it.
    pub async fn update_horoscope_content(
        &self,
        zodiac_sign: &str,
        request: &UpdateHoroscopeContentRequest,
    ) -> Result<HoroscopeContentItem, ApiError> {
        info!(zodiac_sign, "content: updating horoscope template");
        let saved = self
            .gateway
            .update_horoscope_content(zodiac_sign, request)
            .await
            .map_err(|err| {
                error!(zodiac_sign, error = %err, "content: update failed");
                err
            })?;
        self.cache.invalidate(&AdminMutation::UpdateHoroscopeContent {
            zodiac_sign: zodiac_sign.to_string(),
        });
        Ok(saved)
    }
}
