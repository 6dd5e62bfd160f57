use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{AdminSession, DEFAULT_ROUTE, LOGIN_ROUTE};
use crate::axum_http::error_responses::AppError;
use crate::backend_api::{self, BackendClient, auth::AdminInfo};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct SessionRouterState {
    pub client: Arc<BackendClient>,
    pub session: Arc<SessionStore>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub authenticated: bool,
}

pub fn routes(client: Arc<BackendClient>, session: Arc<SessionStore>) -> Router {
    let state = SessionRouterState { client, session };

    Router::new()
        .route(DEFAULT_ROUTE, get(home))
        .route(LOGIN_ROUTE, get(login_page).post(login))
        .route("/logout", post(logout))
        .route("/api/v1/me", get(me))
        .with_state(state)
}

async fn home(_session: AdminSession) -> impl IntoResponse {
    Redirect::to("/api/v1/dashboard")
}

/// The login page is reachable without a session; an already authenticated
/// admin is bounced back to the console instead.
async fn login_page(State(state): State<SessionRouterState>) -> impl IntoResponse {
    if state.session.is_authenticated() {
        return Redirect::to(DEFAULT_ROUTE).into_response();
    }
    Json(LoginView {
        authenticated: false,
    })
    .into_response()
}

/// Exchanges credentials for a bearer token. The token is persisted before
/// the response goes out, so the redirect that follows always finds an
/// authenticated session.
async fn login(
    State(state): State<SessionRouterState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token =
        backend_api::auth::login(&state.client, &request.username, &request.password).await?;

    state.session.set_token(&token.access_token)?;
    info!(username = %request.username, "session: admin logged in");

    Ok(Redirect::to(DEFAULT_ROUTE))
}

async fn logout(State(state): State<SessionRouterState>) -> Result<impl IntoResponse, AppError> {
    state.session.logout()?;
    info!("session: admin logged out");
    Ok(Redirect::to(LOGIN_ROUTE))
}

async fn me(
    State(state): State<SessionRouterState>,
    _session: AdminSession,
) -> Result<Json<AdminInfo>, AppError> {
    let info = backend_api::auth::me(&state.client).await?;
    Ok(Json(info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header::LOCATION};
    use std::sync::atomic::{AtomicU64, Ordering};

    static STORE_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_session() -> Arc<SessionStore> {
        let path = std::env::temp_dir().join(format!(
            "astro-admin-session-router-test-{}-{}.json",
            std::process::id(),
            STORE_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::remove_file(&path).ok();
        Arc::new(SessionStore::load(path))
    }

    fn state_with(session: Arc<SessionStore>, base_url: &str) -> SessionRouterState {
        SessionRouterState {
            client: Arc::new(BackendClient::new(
                base_url.to_string(),
                Arc::clone(&session),
            )),
            session,
        }
    }

    /// Minimal stand-in for the bot backend's token endpoint.
    async fn spawn_token_backend() -> String {
        let app = Router::new().route(
            "/token",
            axum::routing::post(|| async {
                Json(serde_json::json!({
                    "access_token": "issued-token",
                    "token_type": "bearer"
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_login_page_redirects_an_authenticated_admin_home() {
        let session = temp_session();
        session.set_token("existing-token").unwrap();
        let state = state_with(session, "http://127.0.0.1:1");

        let response = login_page(State(state)).await.into_response();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get(LOCATION).unwrap(), DEFAULT_ROUTE);
    }

    #[tokio::test]
    async fn test_login_page_renders_for_an_unauthenticated_visitor() {
        let session = temp_session();
        let state = state_with(session, "http://127.0.0.1:1");

        let response = login_page(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_persists_the_token_before_responding() {
        let base_url = spawn_token_backend().await;
        let session = temp_session();
        let state = state_with(Arc::clone(&session), &base_url);

        let response = login(
            State(state),
            Json(LoginRequest {
                username: "admin".to_string(),
                password: "secret".to_string(),
            }),
        )
        .await
        .unwrap()
        .into_response();

        // The session already holds the token when the redirect goes out.
        assert_eq!(session.token(), Some("issued-token".to_string()));
        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get(LOCATION).unwrap(), DEFAULT_ROUTE);
    }

    #[tokio::test]
    async fn test_logout_clears_the_session_and_redirects_to_login() {
        let session = temp_session();
        session.set_token("short-lived").unwrap();
        let state = state_with(Arc::clone(&session), "http://127.0.0.1:1");

        let response = logout(State(state)).await.unwrap().into_response();

        assert!(!session.is_authenticated());
        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get(LOCATION).unwrap(), LOGIN_ROUTE);
    }
}
