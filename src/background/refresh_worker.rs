use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tracing::{error, info};

use crate::usecases::analytics::{AnalyticsGateway, AnalyticsUseCase};

/// Keeps the dashboard and monitoring views warm while an admin has the
/// console open: every tick their keys are dropped and refetched, so
/// interactive reads keep hitting fresh cache entries. A failed refresh is
/// logged and the loop continues; the next tick retries.
pub async fn run<G>(usecase: Arc<AnalyticsUseCase<G>>, interval_seconds: u64) -> Result<()>
where
    G: AnalyticsGateway + Send + Sync + 'static,
{
    info!(interval_seconds, "refresh worker: started");

    loop {
        tokio::time::sleep(Duration::from_secs(interval_seconds)).await;

        match usecase.refresh_dashboards().await {
            Ok(()) => info!("refresh worker: dashboard metrics refreshed"),
            Err(e) => error!("Error while refreshing dashboard metrics: {}", e),
        }
    }
}
