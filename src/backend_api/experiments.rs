use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, BackendClient};

/// Status moves draft -> running -> completed; transitions are requested,
/// never computed, by the console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentListItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub metric: String,
    pub variant_b_percent: i32,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentListResponse {
    pub items: Vec<ExperimentListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateExperimentRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_b_percent: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentVariantStats {
    pub variant: String,
    pub users: i64,
    pub conversions: i64,
    pub conversion_rate: f64,
}

/// Statistical outcome computed entirely by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentResults {
    pub experiment: ExperimentListItem,
    pub variant_a: ExperimentVariantStats,
    pub variant_b: ExperimentVariantStats,
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct PageQuery {
    page: i64,
    page_size: i64,
}

pub async fn list_experiments(
    client: &BackendClient,
    page: i64,
    page_size: i64,
) -> Result<ExperimentListResponse, ApiError> {
    client
        .get_with_query("/experiments", &PageQuery { page, page_size }, "list experiments")
        .await
}

pub async fn create_experiment(
    client: &BackendClient,
    request: &CreateExperimentRequest,
) -> Result<ExperimentListItem, ApiError> {
    client.post("/experiments", request, "create experiment").await
}

pub async fn start_experiment(client: &BackendClient, experiment_id: i64) -> Result<(), ApiError> {
    client
        .post_empty(&format!("/experiments/{}/start", experiment_id), "start experiment")
        .await
}

pub async fn stop_experiment(client: &BackendClient, experiment_id: i64) -> Result<(), ApiError> {
    client
        .post_empty(&format!("/experiments/{}/stop", experiment_id), "stop experiment")
        .await
}

pub async fn experiment_results(
    client: &BackendClient,
    experiment_id: i64,
) -> Result<ExperimentResults, ApiError> {
    client
        .get(
            &format!("/experiments/{}/results", experiment_id),
            "experiment results",
        )
        .await
}
