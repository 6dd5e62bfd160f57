use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::backend_api::users::{
    BulkActionRequest, BulkActionResponse, GiftRequest, UpdateSubscriptionRequest, UserDetail,
    UserListFilter, UserListResponse,
};
use crate::backend_api::{self, ApiError, BackendClient};
use crate::cache::invalidation::resources;
use crate::cache::{AdminMutation, CacheKey, QueryCache};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersGateway: Send + Sync {
    async fn list_users(&self, filter: &UserListFilter) -> Result<UserListResponse, ApiError>;

    async fn get_user(&self, user_id: i64) -> Result<UserDetail, ApiError>;

    async fn update_subscription(
        &self,
        user_id: i64,
        request: &UpdateSubscriptionRequest,
    ) -> Result<(), ApiError>;

    async fn gift_user(&self, user_id: i64, request: &GiftRequest) -> Result<(), ApiError>;

    async fn bulk_action(&self, request: &BulkActionRequest)
    -> Result<BulkActionResponse, ApiError>;
}

#[async_trait]
impl UsersGateway for BackendClient {
    async fn list_users(&self, filter: &UserListFilter) -> Result<UserListResponse, ApiError> {
        backend_api::users::list_users(self, filter).await
    }

    async fn get_user(&self, user_id: i64) -> Result<UserDetail, ApiError> {
        backend_api::users::get_user(self, user_id).await
    }

    async fn update_subscription(
        &self,
        user_id: i64,
        request: &UpdateSubscriptionRequest,
    ) -> Result<(), ApiError> {
        backend_api::users::update_subscription(self, user_id, request).await
    }

    async fn gift_user(&self, user_id: i64, request: &GiftRequest) -> Result<(), ApiError> {
        backend_api::users::gift_user(self, user_id, request).await
    }

    async fn bulk_action(
        &self,
        request: &BulkActionRequest,
    ) -> Result<BulkActionResponse, ApiError> {
        backend_api::users::bulk_action(self, request).await
    }
}

pub struct UserAdminUseCase<G>
where
    G: UsersGateway + Send + Sync + 'static,
{
    gateway: Arc<G>,
    cache: Arc<QueryCache>,
}

impl<G> UserAdminUseCase<G>
where
    G: UsersGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list_users(&self, filter: &UserListFilter) -> Result<UserListResponse, ApiError> {
        info!(?filter, "users: listing users");
        let key = CacheKey::list(resources::USERS, filter);
        let gateway = Arc::clone(&self.gateway);
        let filter = filter.clone();
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                let filter = filter.clone();
                async move { gateway.list_users(&filter).await }
            })
            .await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<UserDetail, ApiError> {
        info!(user_id, "users: loading user detail");
        let key = CacheKey::entity(resources::USER, user_id);
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.get_user(user_id).await }
            })
            .await
    }

    pub async fn update_subscription(
        &self,
        user_id: i64,
        request: &UpdateSubscriptionRequest,
    ) -> Result<(), ApiError> {
        info!(user_id, action = %request.action, "users: requesting subscription update");
        self.gateway
            .update_subscription(user_id, request)
            .await
            .map_err(|err| {
                error!(user_id, error = %err, "users: subscription update failed");
                err
            })?;
        self.cache
            .invalidate(&AdminMutation::UpdateUserSubscription { user_id });
        Ok(())
    }

    pub async fn gift_user(&self, user_id: i64, request: &GiftRequest) -> Result<(), ApiError> {
        info!(
            user_id,
            gift_type = %request.gift_type,
            value = request.value,
            "users: sending gift"
        );
        self.gateway.gift_user(user_id, request).await.map_err(|err| {
            error!(user_id, error = %err, "users: gift failed");
            err
        })?;
        self.cache.invalidate(&AdminMutation::GiftUser { user_id });
        Ok(())
    }

    pub async fn bulk_action(
        &self,
        request: &BulkActionRequest,
    ) -> Result<BulkActionResponse, ApiError> {
        info!(
            action = %request.action,
            user_count = request.user_ids.len(),
            "users: submitting bulk action"
        );
        let response = self.gateway.bulk_action(request).await.map_err(|err| {
            error!(action = %request.action, error = %err, "users: bulk action failed");
            err
        })?;
        info!(
            success_count = response.success_count,
            failed_count = response.failed_count,
            "users: bulk action completed"
        );
        self.cache.invalidate(&AdminMutation::BulkUserAction);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend_api::users::{BulkAction, SubscriptionAction};
    use std::time::Duration;

    fn sample_list() -> UserListResponse {
        UserListResponse {
            items: vec![],
            total: 0,
            page: 1,
            page_size: 20,
            pages: 0,
        }
    }

    fn usecase(gateway: MockUsersGateway) -> UserAdminUseCase<MockUsersGateway> {
        UserAdminUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        )
    }

    #[tokio::test]
    async fn test_list_users_is_cached_between_reads() {
        let mut gateway = MockUsersGateway::new();
        gateway
            .expect_list_users()
            .times(1)
            .returning(|_| Ok(sample_list()));
        let usecase = usecase(gateway);
        let filter = UserListFilter::default();

        usecase.list_users(&filter).await.unwrap();
        usecase.list_users(&filter).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_subscription_invalidates_users_list() {
        let mut gateway = MockUsersGateway::new();
        gateway
            .expect_list_users()
            .times(2)
            .returning(|_| Ok(sample_list()));
        gateway
            .expect_update_subscription()
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = usecase(gateway);
        let filter = UserListFilter::default();

        usecase.list_users(&filter).await.unwrap();
        usecase
            .update_subscription(
                42,
                &UpdateSubscriptionRequest {
                    action: SubscriptionAction::Extend,
                    days: Some(30),
                },
            )
            .await
            .unwrap();
        // The list key was invalidated, so this read must refetch.
        usecase.list_users(&filter).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_the_cache_intact() {
        let mut gateway = MockUsersGateway::new();
        gateway
            .expect_list_users()
            .times(1)
            .returning(|_| Ok(sample_list()));
        gateway.expect_gift_user().times(1).returning(|_, _| {
            Err(ApiError::Http {
                status: 400,
                message: "invalid gift".to_string(),
            })
        });
        let usecase = usecase(gateway);
        let filter = UserListFilter::default();

        usecase.list_users(&filter).await.unwrap();
        let result = usecase
            .gift_user(
                42,
                &GiftRequest {
                    gift_type: crate::backend_api::users::GiftType::TarotSpreads,
                    value: 5,
                },
            )
            .await;
        assert!(result.is_err());
        // No invalidation happened, so this read is served from cache.
        usecase.list_users(&filter).await.unwrap();
    }

    #[tokio::test]
    async fn test_bulk_action_reports_per_item_counts() {
        let mut gateway = MockUsersGateway::new();
        gateway.expect_bulk_action().times(1).returning(|_| {
            Ok(BulkActionResponse {
                success_count: 2,
                failed_count: 1,
                errors: vec!["user 3: banned".to_string()],
            })
        });
        let usecase = usecase(gateway);

        let response = usecase
            .bulk_action(&BulkActionRequest {
                user_ids: vec![1, 2, 3],
                action: BulkAction::GiftSpreads,
                value: Some(5),
            })
            .await
            .unwrap();

        assert_eq!(response.success_count + response.failed_count, 3);
        assert_eq!(response.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_user_surfaces_the_backend_error() {
        let mut gateway = MockUsersGateway::new();
        gateway.expect_get_user().returning(|_| {
            Err(ApiError::Http {
                status: 404,
                message: "User not found".to_string(),
            })
        });
        let usecase = usecase(gateway);

        let err = usecase.get_user(99999).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "User not found");
    }
}
