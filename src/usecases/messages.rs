use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::backend_api::messages::{
    MessageHistoryResponse, SendMessageRequest, SendMessageResponse,
};
use crate::backend_api::{self, ApiError, BackendClient};
use crate::cache::invalidation::resources;
use crate::cache::{AdminMutation, CacheKey, QueryCache};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagesGateway: Send + Sync {
    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError>;

    async fn message_history(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<MessageHistoryResponse, ApiError>;

    async fn cancel_message(&self, message_id: i64) -> Result<(), ApiError>;
}

#[async_trait]
impl MessagesGateway for BackendClient {
    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError> {
        backend_api::messages::send_message(self, request).await
    }

    async fn message_history(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<MessageHistoryResponse, ApiError> {
        backend_api::messages::message_history(self, page, page_size).await
    }

    async fn cancel_message(&self, message_id: i64) -> Result<(), ApiError> {
        backend_api::messages::cancel_message(self, message_id).await
    }
}

pub struct MessagesUseCase<G>
where
    G: MessagesGateway + Send + Sync + 'static,
{
    gateway: Arc<G>,
    cache: Arc<QueryCache>,
}

impl<G> MessagesUseCase<G>
where
    G: MessagesGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError> {
        info!(
            broadcast = request.target_user_id.is_none(),
            scheduled = request.scheduled_at.is_some(),
            "messages: submitting message"
        );
        let response = self.gateway.send_message(request).await.map_err(|err| {
            error!(error = %err, "messages: send failed");
            err
        })?;
        info!(
            message_id = response.message_id,
            recipients_count = response.recipients_count,
            status = %response.status,
            "messages: message accepted"
        );
        self.cache.invalidate(&AdminMutation::SendMessage);
        Ok(response)
    }

    pub async fn message_history(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<MessageHistoryResponse, ApiError> {
        info!(page, page_size, "messages: loading history");
        let key = CacheKey::list(
            resources::MESSAGES,
            &serde_json::json!({ "page": page, "page_size": page_size }),
        );
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.message_history(page, page_size).await }
            })
            .await
    }

    pub async fn cancel_message(&self, message_id: i64) -> Result<(), ApiError> {
        info!(message_id, "messages: canceling scheduled message");
        self.gateway.cancel_message(message_id).await.map_err(|err| {
            error!(message_id, error = %err, "messages: cancel failed");
            err
        })?;
        self.cache
            .invalidate(&AdminMutation::CancelMessage { message_id });
        Ok(())
    }
}
