use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DatabaseError;
use crate::repos::points_platform::PointsPlatform;
use crate::services::points_valuation::PointsPlatformResolver;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheState {
    Unloaded,
    Loaded(PointsPlatform),
    /// The platform is known not to exist. Stays until `reset`.
    Failed,
}

pub const DEFAULT_FAILURE_LIMIT: usize = 1024;

#[derive(Default)]
struct CacheEntries {
    states: HashMap<String, CacheState>,
    failed: usize,
}

/// Caches resolved platforms per id in front of another resolver.
///
/// Only "not found" is remembered as a failure, and at most `failure_limit`
/// such ids are kept; misses past the limit go back to the inner resolver.
/// Transient lookup errors leave the id unloaded so the next call retries.
pub struct CachedPlatformResolver<R> {
    inner: R,
    failure_limit: usize,
    entries: RwLock<CacheEntries>,
}

impl<R: PointsPlatformResolver> CachedPlatformResolver<R> {
    pub fn new(inner: R) -> Self {
        Self::with_failure_limit(inner, DEFAULT_FAILURE_LIMIT)
    }

    pub fn with_failure_limit(inner: R, failure_limit: usize) -> Self {
        Self {
            inner,
            failure_limit,
            entries: RwLock::new(CacheEntries::default()),
        }
    }

    pub async fn state(&self, id: &str) -> CacheState {
        self.entries
            .read()
            .await
            .states
            .get(id)
            .cloned()
            .unwrap_or(CacheState::Unloaded)
    }

    pub async fn failed_len(&self) -> usize {
        self.entries.read().await.failed
    }

    pub async fn reset(&self) {
        let mut entries = self.entries.write().await;
        entries.states.clear();
        entries.failed = 0;
    }
}

#[async_trait]
impl<R: PointsPlatformResolver> PointsPlatformResolver for CachedPlatformResolver<R> {
    async fn resolve_points_platform(&self, id: &str) -> Result<PointsPlatform, DatabaseError> {
        match self.state(id).await {
            CacheState::Loaded(platform) => {
                tracing::debug!("points platform cache hit for {}", id);
                return Ok(platform);
            }
            CacheState::Failed => {
                return Err(DatabaseError::NotFound(format!("points platform {} (cached)", id)));
            }
            CacheState::Unloaded => {}
        }

        match self.inner.resolve_points_platform(id).await {
            Ok(platform) => {
                let mut entries = self.entries.write().await;
                let previous = entries
                    .states
                    .insert(id.to_string(), CacheState::Loaded(platform.clone()));
                if previous == Some(CacheState::Failed) {
                    entries.failed -= 1;
                }
                Ok(platform)
            }
            Err(e) if e.is_not_found() => {
                let mut entries = self.entries.write().await;
                if entries.failed < self.failure_limit && !entries.states.contains_key(id) {
                    entries.states.insert(id.to_string(), CacheState::Failed);
                    entries.failed += 1;
                } else if entries.failed >= self.failure_limit {
                    tracing::debug!("points platform miss cache full, not caching {}", id);
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::points_platform::InMemoryPlatformResolver;
    use crate::services::points_valuation::tests::SpyResolver;

    fn spy() -> SpyResolver {
        let mut spy = SpyResolver::new(
            InMemoryPlatformResolver::new().with_platform("A", PointsPlatform::new("Platform A", 0.5)),
        );
        spy.broken.push("flaky".to_string());
        spy
    }

    #[tokio::test]
    async fn test_loaded_platform_is_served_from_cache() {
        let cache = CachedPlatformResolver::new(spy());

        assert_eq!(cache.state("A").await, CacheState::Unloaded);
        let first = cache.resolve_points_platform("A").await.unwrap();
        let second = cache.resolve_points_platform("A").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.state("A").await, CacheState::Loaded(first));
        assert_eq!(cache.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_remembered() {
        let cache = CachedPlatformResolver::new(spy());

        assert!(cache.resolve_points_platform("missing").await.unwrap_err().is_not_found());
        assert!(cache.resolve_points_platform("missing").await.unwrap_err().is_not_found());

        assert_eq!(cache.state("missing").await, CacheState::Failed);
        assert_eq!(cache.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_remembered_misses_are_bounded() {
        let cache = CachedPlatformResolver::with_failure_limit(spy(), 100);

        for n in 0..10_000 {
            let id = format!("unknown-{}", n);
            assert!(cache.resolve_points_platform(&id).await.unwrap_err().is_not_found());
        }
        assert_eq!(cache.failed_len().await, 100);
        assert_eq!(cache.state("unknown-99").await, CacheState::Failed);
        assert_eq!(cache.state("unknown-100").await, CacheState::Unloaded);

        // Misses past the limit still resolve through the inner resolver.
        let calls = cache.inner.calls();
        assert!(cache.resolve_points_platform("unknown-5000").await.is_err());
        assert_eq!(cache.inner.calls(), calls + 1);

        // Hits are still cached once the miss side is full.
        cache.resolve_points_platform("A").await.unwrap();
        assert!(matches!(cache.state("A").await, CacheState::Loaded(_)));

        cache.reset().await;
        assert_eq!(cache.failed_len().await, 0);
    }

    #[tokio::test]
    async fn test_lookup_errors_are_retried() {
        let cache = CachedPlatformResolver::new(spy());

        assert!(cache.resolve_points_platform("flaky").await.is_err());
        assert!(cache.resolve_points_platform("flaky").await.is_err());

        assert_eq!(cache.state("flaky").await, CacheState::Unloaded);
        assert_eq!(cache.inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_reset_unloads_everything() {
        let cache = CachedPlatformResolver::new(spy());
        cache.resolve_points_platform("A").await.unwrap();
        let _ = cache.resolve_points_platform("missing").await;

        cache.reset().await;

        assert_eq!(cache.state("A").await, CacheState::Unloaded);
        assert_eq!(cache.state("missing").await, CacheState::Unloaded);
        cache.resolve_points_platform("A").await.unwrap();
        assert_eq!(cache.inner.calls(), 3);
    }
}
