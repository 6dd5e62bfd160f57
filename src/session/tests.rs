use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static STORE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_store_path() -> PathBuf {
    let unique = format!(
        "astro-admin-session-{}-{}.json",
        std::process::id(),
        STORE_COUNTER.fetch_add(1, Ordering::SeqCst)
    );
    std::env::temp_dir().join(unique)
}

#[test]
fn test_missing_file_starts_unauthenticated() {
    let path = temp_store_path();
    let store = SessionStore::load(&path);

    assert!(!store.is_authenticated());
    assert_eq!(store.token(), None);
}

#[test]
fn test_set_token_persists_before_returning() {
    let path = temp_store_path();
    let store = SessionStore::load(&path);

    store.set_token("admin-token-123").unwrap();

    assert!(store.is_authenticated());
    let raw = std::fs::read_to_string(&path).expect("state file should exist after set_token");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["state"]["token"], "admin-token-123");

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_reload_restores_session() {
    let path = temp_store_path();
    {
        let store = SessionStore::load(&path);
        store.set_token("persisted-token").unwrap();
    }

    let reloaded = SessionStore::load(&path);
    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.token(), Some("persisted-token".to_string()));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_logout_clears_token_and_file_state() {
    let path = temp_store_path();
    let store = SessionStore::load(&path);
    store.set_token("short-lived").unwrap();

    store.logout().unwrap();

    assert!(!store.is_authenticated());
    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["state"]["token"], serde_json::Value::Null);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_concurrent_transitions_keep_file_and_memory_in_sync() {
    let path = temp_store_path();
    let store = Arc::new(SessionStore::load(&path));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                store.set_token(&format!("token-{}", i)).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whichever transition won in memory must also be the last one written
    // to disk.
    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["state"]["token"], store.token().unwrap());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_malformed_file_starts_unauthenticated() {
    let path = temp_store_path();
    std::fs::write(&path, "{not json").unwrap();

    let store = SessionStore::load(&path);
    assert!(!store.is_authenticated());

    std::fs::remove_file(&path).ok();
}
