use crate::{
    axum_http::{default_routers, routers},
    backend_api::BackendClient,
    cache::QueryCache,
    config::config_model::DotEnvyConfig,
    session::SessionStore,
};
use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub async fn start(
    config: Arc<DotEnvyConfig>,
    client: Arc<BackendClient>,
    session: Arc<SessionStore>,
    cache: Arc<QueryCache>,
) -> Result<()> {
    let app = Router::new()
        .fallback(default_routers::not_found)
        .merge(routers::session::routes(
            Arc::clone(&client),
            Arc::clone(&session),
        ))
        .nest(
            "/api/v1/users",
            routers::users::routes(Arc::clone(&client), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/payments",
            routers::billing::payment_routes(Arc::clone(&client), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/subscriptions",
            routers::billing::subscription_routes(Arc::clone(&client), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/tarot-spreads",
            routers::spreads::routes(Arc::clone(&client), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/messages",
            routers::messages::routes(Arc::clone(&client), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/content",
            routers::content::routes(Arc::clone(&client), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/promo-codes",
            routers::promo_codes::routes(Arc::clone(&client), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/experiments",
            routers::experiments::routes(Arc::clone(&client), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1",
            routers::analytics::routes(Arc::clone(&client), Arc::clone(&cache)),
        )
        .nest("/api/v1/export", routers::export::routes(Arc::clone(&client)))
        .route("/api/v1/health-check", get(default_routers::health_check))
        // The route guard reads the session store from request extensions.
        .layer(Extension(Arc::clone(&session)))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.admin_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.admin_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any), // TODO Add the domain later
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.admin_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.admin_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
