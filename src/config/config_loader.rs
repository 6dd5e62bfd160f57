use anyhow::{Context, Result};
use url::Url;

use super::config_model::{AdminServer, BackendApi, Cache, DotEnvyConfig, Session};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let admin_server = AdminServer {
        port: std::env::var("SERVER_PORT_ADMIN")
            .expect("SERVER_PORT_ADMIN is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let raw_base_url = std::env::var("BACKEND_API_BASE_URL").expect("BACKEND_API_BASE_URL is invalid");
    // Validate early so a typo fails at startup, not on the first request.
    Url::parse(&raw_base_url).context("BACKEND_API_BASE_URL is not a valid URL")?;
    let backend_api = BackendApi {
        base_url: raw_base_url.trim_end_matches('/').to_string(),
    };

    let session = Session {
        store_path: std::env::var("SESSION_STORE_PATH")
            .unwrap_or_else(|_| "./admin-session.json".to_string()),
    };

    let cache = Cache {
        ttl_seconds: std::env::var("CACHE_TTL_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?,
        dashboard_refresh_seconds: std::env::var("DASHBOARD_REFRESH_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        admin_server,
        backend_api,
        session,
        cache,
    })
}
