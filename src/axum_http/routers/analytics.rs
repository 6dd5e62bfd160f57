use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::auth::AdminSession;
use crate::axum_http::error_responses::AppError;
use crate::backend_api::BackendClient;
use crate::backend_api::analytics::{
    DashboardMetrics, FunnelData, MonitoringData, TimeRange, UtmAnalyticsResponse,
};
use crate::cache::QueryCache;
use crate::usecases::analytics::{AnalyticsGateway, AnalyticsUseCase};

#[derive(Debug, Deserialize)]
pub struct FunnelPeriodQuery {
    #[serde(default = "default_funnel_days")]
    pub days: i64,
}

fn default_funnel_days() -> i64 {
    30
}

#[derive(Debug, Default, Deserialize)]
pub struct MonitoringRangeQuery {
    #[serde(default)]
    pub range: TimeRange,
}

pub fn routes(client: Arc<BackendClient>, cache: Arc<QueryCache>) -> Router {
    let analytics_usecase = AnalyticsUseCase::new(client, cache);

    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/funnel", get(funnel))
        .route("/monitoring", get(monitoring))
        .route("/utm-analytics", get(utm_analytics))
        .with_state(Arc::new(analytics_usecase))
}

pub async fn dashboard<G>(
    State(analytics_usecase): State<Arc<AnalyticsUseCase<G>>>,
    _session: AdminSession,
) -> Result<Json<DashboardMetrics>, AppError>
where
    G: AnalyticsGateway + Send + Sync + 'static,
{
    let metrics = analytics_usecase.dashboard_metrics().await?;
    Ok(Json(metrics))
}

pub async fn funnel<G>(
    State(analytics_usecase): State<Arc<AnalyticsUseCase<G>>>,
    _session: AdminSession,
    Query(query): Query<FunnelPeriodQuery>,
) -> Result<Json<FunnelData>, AppError>
where
    G: AnalyticsGateway + Send + Sync + 'static,
{
    if query.days <= 0 {
        return Err(AppError::BadRequest(
            "funnel period must be positive".to_string(),
        ));
    }
    let data = analytics_usecase.funnel(query.days).await?;
    Ok(Json(data))
}

pub async fn monitoring<G>(
    State(analytics_usecase): State<Arc<AnalyticsUseCase<G>>>,
    _session: AdminSession,
    Query(query): Query<MonitoringRangeQuery>,
) -> Result<Json<MonitoringData>, AppError>
where
    G: AnalyticsGateway + Send + Sync + 'static,
{
    let data = analytics_usecase.monitoring(query.range).await?;
    Ok(Json(data))
}

pub async fn utm_analytics<G>(
    State(analytics_usecase): State<Arc<AnalyticsUseCase<G>>>,
    _session: AdminSession,
) -> Result<Json<UtmAnalyticsResponse>, AppError>
where
    G: AnalyticsGateway + Send + Sync + 'static,
{
    let response = analytics_usecase.utm_analytics().await?;
    Ok(Json(response))
}
