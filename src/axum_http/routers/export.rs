use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use crate::auth::AdminSession;
use crate::axum_http::error_responses::AppError;
use crate::backend_api::{self, BackendClient};

pub fn routes(client: Arc<BackendClient>) -> Router {
    Router::new()
        .route("/users", get(export_users))
        .route("/payments", get(export_payments))
        .route("/metrics", get(export_metrics))
        .with_state(client)
}

fn csv_response(filename: &str, body: String) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

pub async fn export_users(
    State(client): State<Arc<BackendClient>>,
    _session: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let csv = backend_api::export::export_users(&client).await?;
    Ok(csv_response("users.csv", csv))
}

pub async fn export_payments(
    State(client): State<Arc<BackendClient>>,
    _session: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let csv = backend_api::export::export_payments(&client).await?;
    Ok(csv_response("payments.csv", csv))
}

pub async fn export_metrics(
    State(client): State<Arc<BackendClient>>,
    _session: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let csv = backend_api::export::export_metrics(&client).await?;
    Ok(csv_response("metrics.csv", csv))
}
