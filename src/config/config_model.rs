#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub admin_server: AdminServer,
    pub backend_api: BackendApi,
    pub session: Session,
    pub cache: Cache,
}

#[derive(Debug, Clone)]
pub struct AdminServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct BackendApi {
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub store_path: String,
}

#[derive(Debug, Clone)]
pub struct Cache {
    pub ttl_seconds: u64,
    pub dashboard_refresh_seconds: u64,
}
