use std::time::Duration;

use async_trait::async_trait;
use rand::RngExt;
use tracing::{debug, warn};

use crate::cache::PersistentCache;
use crate::models::{Coordinate, Route, TransportMode};
use crate::routing::provider::DirectionsProvider;

/// Caches successful routes from an inner provider.
///
/// Failures are never cached, and a broken cache only costs a warning.
pub struct CachedProvider<P> {
    inner: P,
    cache: PersistentCache,
    ttl: Duration,
}

impl<P: DirectionsProvider> CachedProvider<P> {
    pub fn new(inner: P, cache: PersistentCache, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Spread expiries so routes fetched together don't expire together
    fn jittered_ttl(&self) -> Duration {
        let jitter: f64 = rand::rng().random_range(0.9..1.1);
        self.ttl.mul_f64(jitter)
    }
}

fn route_key(mode: TransportMode, origin: &Coordinate, destination: &Coordinate) -> String {
    format!(
        "route:{}:{}-{}",
        mode.id(),
        origin.cache_key(),
        destination.cache_key()
    )
}

#[async_trait]
impl<P: DirectionsProvider> DirectionsProvider for CachedProvider<P> {
    async fn route(
        &self,
        mode: TransportMode,
        origin: Coordinate,
        destination: Coordinate,
    ) -> crate::Result<Route> {
        let key = route_key(mode, &origin, &destination);

        match self.cache.get::<Route>(&key).await {
            Ok(Some(route)) => {
                debug!("[CACHE] Hit for {}", key);
                return Ok(route);
            }
            Ok(None) => debug!("[CACHE] Miss for {}", key),
            Err(e) => warn!("[CACHE] Read failed for {}: {:#}", key, e),
        }

        let route = self.inner.route(mode, origin, destination).await?;

        if let Err(e) = self.cache.put(&key, route.clone(), self.jittered_ttl()).await {
            warn!("[CACHE] Write failed for {}: {:#}", key, e);
        }

        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EcoRouteError;
    use crate::models::RouteSummary;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl DirectionsProvider for CountingProvider {
        async fn route(
            &self,
            _mode: TransportMode,
            origin: Coordinate,
            destination: Coordinate,
        ) -> crate::Result<Route> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EcoRouteError::provider("offline"));
            }
            Ok(Route::new(
                RouteSummary::new(1_200.0, 900.0),
                vec![origin, destination],
            ))
        }
    }

    fn cached(fail: bool) -> (tempfile::TempDir, CachedProvider<CountingProvider>) {
        let dir = tempfile::tempdir().unwrap();
        let cache = PersistentCache::open(dir.path().join("db")).unwrap();
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
            fail,
        };
        (dir, CachedProvider::new(provider, cache, Duration::from_secs(3_600)))
    }

    #[test]
    fn test_route_key_rounds_coordinates() {
        let key = route_key(
            TransportMode::Cycling,
            &Coordinate::new(13.404_954, 52.520_008),
            &Coordinate::new(13.377_704, 52.516_275),
        );
        assert_eq!(key, "route:cycling-regular:13.4050,52.5200-13.3777,52.5163");
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let (_dir, provider) = cached(false);
        let origin = Coordinate::new(13.405, 52.52);
        let destination = Coordinate::new(13.4, 52.51);

        let first = provider
            .route(TransportMode::Walking, origin, destination)
            .await
            .unwrap();
        let second = provider
            .route(TransportMode::Walking, origin, destination)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (_dir, provider) = cached(true);
        let origin = Coordinate::new(0.0, 0.0);
        let destination = Coordinate::new(0.1, 0.1);

        for _ in 0..2 {
            let result = provider.route(TransportMode::Driving, origin, destination).await;
            assert!(matches!(result, Err(EcoRouteError::Provider { .. })));
        }
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_jittered_ttl_stays_within_ten_percent() {
        let (_dir, provider) = cached(false);
        for _ in 0..50 {
            let ttl = provider.jittered_ttl().as_secs_f64();
            assert!((3_240.0..3_960.0).contains(&ttl), "ttl {ttl}");
        }
    }
}
