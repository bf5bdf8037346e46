//! Read-only library cache

use super::error::GeneratorResult;
use super::library::{TemplateLibrary, TemplateProvider};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    library: Arc<TemplateLibrary>,
    created_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    entry: Option<CacheEntry>,
    hits: usize,
    misses: usize,
}

/// Keeps the last loaded library for a TTL and hands out shared references to it.
///
/// The library is never mutated after load, so concurrent requests can share it freely.
pub struct CachedTemplateProvider {
    inner: Arc<dyn TemplateProvider>,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl CachedTemplateProvider {
    pub fn new(inner: Arc<dyn TemplateProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    fn cached(&self) -> Option<Arc<TemplateLibrary>> {
        let mut state = self.state.lock().ok()?;
        let fresh = state
            .entry
            .as_ref()
            .filter(|entry| entry.created_at.elapsed() <= self.ttl)
            .map(|entry| Arc::clone(&entry.library));

        match fresh {
            Some(library) => {
                state.hits += 1;
                Some(library)
            }
            None => {
                state.misses += 1;
                state.entry = None;
                None
            }
        }
    }

    /// Drop the cached library; the next load goes to the inner provider
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = CacheState::default();
        }
    }

    /// Cache statistics (hits, misses)
    pub fn stats(&self) -> (usize, usize) {
        self.state
            .lock()
            .map(|state| (state.hits, state.misses))
            .unwrap_or_default()
    }
}

#[async_trait]
impl TemplateProvider for CachedTemplateProvider {
    async fn load(&self) -> GeneratorResult<Arc<TemplateLibrary>> {
        if let Some(library) = self.cached() {
            debug!("Template library cache hit");
            return Ok(library);
        }

        let library = self.inner.load().await?;
        if let Ok(mut state) = self.state.lock() {
            state.entry = Some(CacheEntry {
                library: Arc::clone(&library),
                created_at: Instant::now(),
            });
        }
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl TemplateProvider for CountingProvider {
        async fn load(&self) -> GeneratorResult<Arc<TemplateLibrary>> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(TemplateLibrary::new(vec![format!("-- load {n}")])))
        }
    }

    fn counting() -> Arc<CountingProvider> {
        Arc::new(CountingProvider {
            loads: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_cache_hit_reuses_library() {
        let inner = counting();
        let cache = CachedTemplateProvider::new(inner.clone(), Duration::from_secs(60));

        let first = cache.load().await.unwrap();
        let second = cache.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(inner.loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let inner = counting();
        let cache = CachedTemplateProvider::new(inner.clone(), Duration::ZERO);

        cache.load().await.unwrap();
        std::thread::sleep(Duration::from_millis(10));
        cache.load().await.unwrap();

        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let inner = counting();
        let cache = CachedTemplateProvider::new(inner.clone(), Duration::from_secs(60));

        cache.load().await.unwrap();
        cache.clear();
        assert_eq!(cache.stats(), (0, 0));

        let library = cache.load().await.unwrap();
        assert_eq!(library.iter().next(), Some("-- load 1"));
    }
}
