use super::{ApiError, BackendClient};

/// CSV exports, streamed back verbatim from the backend.
pub async fn export_users(client: &BackendClient) -> Result<String, ApiError> {
    client.get_text("/export/users", "export users csv").await
}

pub async fn export_payments(client: &BackendClient) -> Result<String, ApiError> {
    client
        .get_text("/export/payments", "export payments csv")
        .await
}

pub async fn export_metrics(client: &BackendClient) -> Result<String, ApiError> {
    client
        .get_text("/export/metrics", "export metrics csv")
        .await
}
