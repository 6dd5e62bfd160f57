use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::auth::AdminSession;
use crate::axum_http::error_responses::AppError;
use crate::axum_http::format;
use crate::backend_api::BackendClient;
use crate::backend_api::experiments::{
    CreateExperimentRequest, ExperimentListItem, ExperimentListResponse, ExperimentResults,
    ExperimentVariantStats,
};
use crate::cache::QueryCache;
use crate::usecases::experiments::{ExperimentsGateway, ExperimentsUseCase};

#[derive(Debug, Deserialize)]
pub struct ExperimentPageQuery {
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

#[derive(Debug, Serialize)]
pub struct VariantView {
    #[serde(flatten)]
    pub stats: ExperimentVariantStats,
    pub conversion_rate_display: String,
}

/// Results with preformatted conversion rates next to the raw numbers.
#[derive(Debug, Serialize)]
pub struct ExperimentResultsView {
    pub experiment: ExperimentListItem,
    pub variant_a: VariantView,
    pub variant_b: VariantView,
    pub winner: Option<String>,
}

fn variant_view(stats: ExperimentVariantStats) -> VariantView {
    let conversion_rate_display = format::percent(stats.conversion_rate * 100.0);
    VariantView {
        stats,
        conversion_rate_display,
    }
}

fn results_view(results: ExperimentResults) -> ExperimentResultsView {
    ExperimentResultsView {
        experiment: results.experiment,
        variant_a: variant_view(results.variant_a),
        variant_b: variant_view(results.variant_b),
        winner: results.winner,
    }
}

pub fn routes(client: Arc<BackendClient>, cache: Arc<QueryCache>) -> Router {
    let experiments_usecase = ExperimentsUseCase::new(client, cache);

    Router::new()
        .route("/", get(list_experiments).post(create_experiment))
        .route("/:experiment_id/start", post(start_experiment))
        .route("/:experiment_id/stop", post(stop_experiment))
        .route("/:experiment_id/results", get(experiment_results))
        .with_state(Arc::new(experiments_usecase))
}

pub async fn list_experiments<G>(
    State(experiments_usecase): State<Arc<ExperimentsUseCase<G>>>,
    _session: AdminSession,
    Query(query): Query<ExperimentPageQuery>,
) -> Result<Json<ExperimentListResponse>, AppError>
where
    G: ExperimentsGateway + Send + Sync + 'static,
{
    let response = experiments_usecase
        .list_experiments(query.page, query.page_size)
        .await?;
    Ok(Json(response))
}

pub async fn create_experiment<G>(
    State(experiments_usecase): State<Arc<ExperimentsUseCase<G>>>,
    _session: AdminSession,
    Json(request): Json<CreateExperimentRequest>,
) -> Result<(StatusCode, Json<ExperimentListItem>), AppError>
where
    G: ExperimentsGateway + Send + Sync + 'static,
{
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("experiment name is empty".to_string()));
    }
    if let Some(percent) = request.variant_b_percent
        && !(1..=99).contains(&percent)
    {
        return Err(AppError::BadRequest(
            "variant B share must be between 1 and 99 percent".to_string(),
        ));
    }

    let created = experiments_usecase.create_experiment(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn start_experiment<G>(
    State(experiments_usecase): State<Arc<ExperimentsUseCase<G>>>,
    _session: AdminSession,
    Path(experiment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    G: ExperimentsGateway + Send + Sync + 'static,
{
    experiments_usecase.start_experiment(experiment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stop_experiment<G>(
    State(experiments_usecase): State<Arc<ExperimentsUseCase<G>>>,
    _session: AdminSession,
    Path(experiment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    G: ExperimentsGateway + Send + Sync + 'static,
{
    experiments_usecase.stop_experiment(experiment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn experiment_results<G>(
    State(experiments_usecase): State<Arc<ExperimentsUseCase<G>>>,
    _session: AdminSession,
    Path(experiment_id): Path<i64>,
) -> Result<Json<ExperimentResultsView>, AppError>
where
    G: ExperimentsGateway + Send + Sync + 'static,
{
    let results = experiments_usecase.experiment_results(experiment_id).await?;
    Ok(Json(results_view(results)))
}
