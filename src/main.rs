use std::{sync::Arc, time::Duration};

use anyhow::Result;
use astro_admin::{
    axum_http::http_serve,
    backend_api::BackendClient,
    background::refresh_worker,
    cache::QueryCache,
    config::config_loader,
    observability,
    session::SessionStore,
    usecases::analytics::AnalyticsUseCase,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Admin console exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability()?;

    let dotenvy_env = Arc::new(config_loader::load()?);
    info!("ENV has been loaded");

    let session = Arc::new(SessionStore::load(&dotenvy_env.session.store_path));
    let client = Arc::new(BackendClient::new(
        dotenvy_env.backend_api.base_url.clone(),
        Arc::clone(&session),
    ));
    let cache = Arc::new(QueryCache::new(Duration::from_secs(
        dotenvy_env.cache.ttl_seconds,
    )));

    let analytics_usecase = Arc::new(AnalyticsUseCase::new(
        Arc::clone(&client),
        Arc::clone(&cache),
    ));
    let dashboard_refresh_loop = tokio::spawn(refresh_worker::run(
        analytics_usecase,
        dotenvy_env.cache.dashboard_refresh_seconds,
    ));

    let server = tokio::spawn(http_serve::start(dotenvy_env, client, session, cache));

    tokio::select! {
        result = server => result??,
        result = dashboard_refresh_loop => result??,
    };

    Ok(())
}
