use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::auth::AdminSession;
use crate::axum_http::error_responses::AppError;
use crate::backend_api::BackendClient;
use crate::backend_api::spreads::{SpreadListFilter, TarotSpreadDetail, TarotSpreadListResponse};
use crate::cache::QueryCache;
use crate::usecases::spreads::{SpreadsGateway, SpreadsUseCase};

pub fn routes(client: Arc<BackendClient>, cache: Arc<QueryCache>) -> Router {
    let spreads_usecase = SpreadsUseCase::new(client, cache);

    Router::new()
        .route("/", get(list_spreads))
        .route("/:spread_id", get(get_spread))
        .with_state(Arc::new(spreads_usecase))
}

pub async fn list_spreads<G>(
    State(spreads_usecase): State<Arc<SpreadsUseCase<G>>>,
    _session: AdminSession,
    Query(filter): Query<SpreadListFilter>,
) -> Result<Json<TarotSpreadListResponse>, AppError>
where
    G: SpreadsGateway + Send + Sync + 'static,
{
    let response = spreads_usecase.list_spreads(&filter).await?;
    Ok(Json(response))
}

pub async fn get_spread<G>(
    State(spreads_usecase): State<Arc<SpreadsUseCase<G>>>,
    _session: AdminSession,
    Path(spread_id): Path<i64>,
) -> Result<Json<TarotSpreadDetail>, AppError>
where
    G: SpreadsGateway + Send + Sync + 'static,
{
    let detail = spreads_usecase.get_spread(spread_id).await?;
    Ok(Json(detail))
}
