use super::*;
use invalidation::resources;
use std::sync::atomic::{AtomicU32, Ordering};

#[tokio::test]
async fn test_fresh_entry_is_served_without_a_fetch() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let calls = AtomicU32::new(0);
    let key = CacheKey::bare(resources::DASHBOARD);

    let fetch = || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok::<i64, ApiError>(41) }
    };

    let first = cache.get_or_fetch(key.clone(), fetch).await.unwrap();
    let second = cache.get_or_fetch(key, fetch).await.unwrap();

    assert_eq!(first, 41);
    assert_eq!(second, 41);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stale_entry_triggers_a_refetch() {
    let cache = QueryCache::new(Duration::ZERO);
    let calls = AtomicU32::new(0);
    let key = CacheKey::bare(resources::DASHBOARD);

    let fetch = || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok::<i64, ApiError>(1) }
    };

    cache.get_or_fetch(key.clone(), fetch).await.unwrap();
    cache.get_or_fetch(key, fetch).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_fetch_retries_exactly_once() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let calls = AtomicU32::new(0);
    let key = CacheKey::bare(resources::FUNNEL);

    let result = cache
        .get_or_fetch(key, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(ApiError::Transport {
                        message: "connection reset".to_string(),
                    })
                } else {
                    Ok::<i64, ApiError>(7)
                }
            }
        })
        .await
        .unwrap();

    assert_eq!(result, 7);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_two_failures_surface_the_error_without_more_attempts() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let calls = AtomicU32::new(0);
    let key = CacheKey::bare(resources::FUNNEL);

    let result: Result<i64, ApiError> = cache
        .get_or_fetch(key, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ApiError::Http {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            }
        })
        .await;

    assert_eq!(
        result,
        Err(ApiError::Http {
            status: 503,
            message: "unavailable".to_string(),
        })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_resource_eviction_only_touches_that_resource() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let list_key = CacheKey::list(resources::USERS, &serde_json::json!({"page": 1}));
    let detail_key = CacheKey::entity(resources::USER, 42);

    cache
        .get_or_fetch(list_key.clone(), || async { Ok::<i64, ApiError>(1) })
        .await
        .unwrap();
    cache
        .get_or_fetch(detail_key.clone(), || async { Ok::<i64, ApiError>(2) })
        .await
        .unwrap();

    cache.evict(&KeySelector::Resource(resources::USERS));

    assert_eq!(cache.lookup::<i64>(&list_key), None);
    assert_eq!(cache.lookup::<i64>(&detail_key), Some(2));
}

#[tokio::test]
async fn test_entity_eviction_leaves_other_entities_cached() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let first = CacheKey::entity(resources::USER, 1);
    let second = CacheKey::entity(resources::USER, 2);

    cache
        .get_or_fetch(first.clone(), || async { Ok::<i64, ApiError>(10) })
        .await
        .unwrap();
    cache
        .get_or_fetch(second.clone(), || async { Ok::<i64, ApiError>(20) })
        .await
        .unwrap();

    cache.evict(&KeySelector::Entity(resources::USER, "1".to_string()));

    assert_eq!(cache.lookup::<i64>(&first), None);
    assert_eq!(cache.lookup::<i64>(&second), Some(20));
}

#[tokio::test]
async fn test_superseded_fetch_result_is_not_cached() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let key = CacheKey::entity(resources::USER, 1);

    // The key is invalidated while the fetch is still in flight; the stale
    // response is returned to the caller but must not land in the cache.
    let value = cache
        .get_or_fetch(key.clone(), || async {
            cache.evict(&KeySelector::Entity(resources::USER, "1".to_string()));
            Ok::<i64, ApiError>(5)
        })
        .await
        .unwrap();

    assert_eq!(value, 5);
    assert_eq!(cache.lookup::<i64>(&key), None);
}

#[tokio::test]
async fn test_invalidate_applies_the_mutation_table() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let list_key = CacheKey::list(resources::USERS, &serde_json::json!({"page": 1}));
    let detail_key = CacheKey::entity(resources::USER, 42);
    let payments_key = CacheKey::list(resources::PAYMENTS, &serde_json::json!({}));

    for (key, value) in [(&list_key, 1), (&detail_key, 2), (&payments_key, 3)] {
        cache
            .get_or_fetch(key.clone(), || async move { Ok::<i64, ApiError>(value) })
            .await
            .unwrap();
    }

    cache.invalidate(&AdminMutation::GiftUser { user_id: 42 });

    assert_eq!(cache.lookup::<i64>(&list_key), None);
    assert_eq!(cache.lookup::<i64>(&detail_key), None);
    assert_eq!(cache.lookup::<i64>(&payments_key), Some(3));
}
