//! Cache mirror round trips across resolver restarts.

mod common;

use std::sync::Arc;
use std::time::Duration;

use labelscore::cache::{CACHE_NAMESPACE, CacheMirror, FileCacheMirror, ResolutionCache};
use labelscore::{IngredientRecord, MockNutritionSource, MockResponse, ResolutionSource, TieredIngredientResolver};
use tempfile::TempDir;

fn resolver(
    dir: &TempDir,
    source: Arc<MockNutritionSource>,
    ttl: Duration,
) -> TieredIngredientResolver {
    TieredIngredientResolver::builder(Arc::new(ResolutionCache::with_limits(100, ttl)))
        .external(source)
        .retry_policy(common::fixtures::fast_retry(1))
        .mirror(Arc::new(FileCacheMirror::new(dir.path())))
        .build()
}

#[tokio::test]
async fn test_restart_serves_cached_records_without_network() {
    let dir = TempDir::new().unwrap();
    let ttl = Duration::from_secs(3600);

    let first_source = Arc::new(MockNutritionSource::new(MockResponse::graded("b", &[])));
    let first = resolver(&dir, first_source.clone(), ttl);
    let original = first.resolve("rice crackers").await.unwrap();
    first.dehydrate().await;
    drop(first);

    let file = dir.path().join(format!("{CACHE_NAMESPACE}.json"));
    assert!(file.exists());

    let second_source = Arc::new(MockNutritionSource::unavailable());
    let second = resolver(&dir, second_source.clone(), ttl);
    assert_eq!(second.hydrate(), 1);

    let restored = second.resolve("rice crackers").await.unwrap();
    assert_eq!(restored.source(), ResolutionSource::Cache);
    assert!(restored.same_payload(&original));
    assert_eq!(second_source.calls(), 0);
}

#[tokio::test]
async fn test_expired_entries_are_not_hydrated() {
    let dir = TempDir::new().unwrap();
    let mirror = FileCacheMirror::new(dir.path());

    let stale = labelscore::cache::CacheEntry::new(
        "old thing",
        IngredientRecord::new("old thing", ResolutionSource::Heuristic).with_score(50),
        Duration::from_millis(1),
        labelscore::cache::now_millis() - 60_000,
    );
    mirror.persist(std::slice::from_ref(&stale)).unwrap();

    let resolver = resolver(&dir, Arc::new(MockNutritionSource::empty()), Duration::from_secs(60));
    assert_eq!(resolver.hydrate(), 0);
    assert!(resolver.cache().is_empty());
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(format!("{CACHE_NAMESPACE}.json")), b"{not json").unwrap();

    let resolver = resolver(&dir, Arc::new(MockNutritionSource::empty()), Duration::from_secs(60));
    assert_eq!(resolver.hydrate(), 0);

    // Writes replace the corrupt file with a valid snapshot.
    resolver.resolve("pectin").await.unwrap();
    let reloaded: Vec<labelscore::cache::CacheEntry<IngredientRecord>> =
        FileCacheMirror::new(dir.path()).load().unwrap();
    assert_eq!(reloaded.len(), 1);
}
