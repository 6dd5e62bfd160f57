use super::*;
use axum::http::{Request, header::LOCATION};

fn parts_with_store(store: Arc<SessionStore>) -> Parts {
    let request = Request::builder()
        .uri("/api/v1/users")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();
    parts.extensions.insert(store);
    parts
}

static STORE_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

fn temp_store() -> Arc<SessionStore> {
    let path = std::env::temp_dir().join(format!(
        "astro-admin-auth-test-{}-{}.json",
        std::process::id(),
        STORE_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    ));
    std::fs::remove_file(&path).ok();
    Arc::new(SessionStore::load(path))
}

#[tokio::test]
async fn test_guard_allows_authenticated_request() {
    let store = temp_store();
    store.set_token("valid-token").unwrap();
    let mut parts = parts_with_store(Arc::clone(&store));

    let session = AdminSession::from_request_parts(&mut parts, &())
        .await
        .expect("guard should pass with a stored token");
    assert_eq!(session.token, "valid-token");

    store.logout().unwrap();
}

#[tokio::test]
async fn test_guard_redirects_without_token() {
    let store = temp_store();
    store.logout().unwrap();
    let mut parts = parts_with_store(store);

    let rejection = AdminSession::from_request_parts(&mut parts, &())
        .await
        .expect_err("guard should reject without a token");

    let response = rejection.into_response();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get(LOCATION).unwrap(),
        LOGIN_ROUTE
    );
}

#[tokio::test]
async fn test_guard_redirects_when_store_is_absent() {
    let request = Request::builder().uri("/api/v1/users").body(()).unwrap();
    let (mut parts, _) = request.into_parts();

    let rejection = AdminSession::from_request_parts(&mut parts, &()).await;
    assert!(rejection.is_err());
}
