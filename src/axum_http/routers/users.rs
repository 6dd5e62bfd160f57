use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use serde::Serialize;

use crate::auth::AdminSession;
use crate::axum_http::error_responses::AppError;
use crate::backend_api::BackendClient;
use crate::backend_api::users::{
    BulkActionRequest, GiftRequest, UpdateSubscriptionRequest, UserDetail, UserListFilter,
    UserListResponse,
};
use crate::cache::QueryCache;
use crate::usecases::users::{UserAdminUseCase, UsersGateway};

/// Bulk outcome with a ready-to-display summary line alongside the raw counts.
#[derive(Debug, Serialize)]
pub struct BulkActionView {
    pub success_count: i64,
    pub failed_count: i64,
    pub errors: Vec<String>,
    pub message: String,
}

pub fn routes(client: Arc<BackendClient>, cache: Arc<QueryCache>) -> Router {
    let users_usecase = UserAdminUseCase::new(client, cache);

    Router::new()
        .route("/", get(list_users))
        .route("/bulk", post(bulk_action))
        .route("/:user_id", get(get_user))
        .route("/:user_id/subscription", patch(update_subscription))
        .route("/:user_id/gift", post(gift_user))
        .with_state(Arc::new(users_usecase))
}

pub async fn list_users<G>(
    State(users_usecase): State<Arc<UserAdminUseCase<G>>>,
    _session: AdminSession,
    Query(filter): Query<UserListFilter>,
) -> Result<Json<UserListResponse>, AppError>
where
    G: UsersGateway + Send + Sync + 'static,
{
    let response = users_usecase.list_users(&filter).await?;
    Ok(Json(response))
}

pub async fn get_user<G>(
    State(users_usecase): State<Arc<UserAdminUseCase<G>>>,
    _session: AdminSession,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDetail>, AppError>
where
    G: UsersGateway + Send + Sync + 'static,
{
    let detail = users_usecase.get_user(user_id).await?;
    Ok(Json(detail))
}

pub async fn update_subscription<G>(
    State(users_usecase): State<Arc<UserAdminUseCase<G>>>,
    _session: AdminSession,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> Result<Json<UserDetail>, AppError>
where
    G: UsersGateway + Send + Sync + 'static,
{
    users_usecase.update_subscription(user_id, &request).await?;
    // The entity key was just invalidated, so this read returns the
    // post-mutation state.
    let detail = users_usecase.get_user(user_id).await?;
    Ok(Json(detail))
}

pub async fn gift_user<G>(
    State(users_usecase): State<Arc<UserAdminUseCase<G>>>,
    _session: AdminSession,
    Path(user_id): Path<i64>,
    Json(request): Json<GiftRequest>,
) -> Result<Json<UserDetail>, AppError>
where
    G: UsersGateway + Send + Sync + 'static,
{
    users_usecase.gift_user(user_id, &request).await?;
    let detail = users_usecase.get_user(user_id).await?;
    Ok(Json(detail))
}

pub async fn bulk_action<G>(
    State(users_usecase): State<Arc<UserAdminUseCase<G>>>,
    _session: AdminSession,
    Json(request): Json<BulkActionRequest>,
) -> Result<Json<BulkActionView>, AppError>
where
    G: UsersGateway + Send + Sync + 'static,
{
    if request.user_ids.is_empty() {
        return Err(AppError::BadRequest("no users selected".to_string()));
    }

    let response = users_usecase.bulk_action(&request).await?;
    let message = format!(
        "{} succeeded, {} failed",
        response.success_count, response.failed_count
    );
    Ok(Json(BulkActionView {
        success_count: response.success_count,
        failed_count: response.failed_count,
        errors: response.errors,
        message,
    }))
}
