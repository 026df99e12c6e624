//! Caching layer for location searches.
//!
//! Autocomplete re-sends the same prefixes as the user types and deletes, so
//! successful `/locations` responses are kept for a few minutes. Station boards
//! are never cached: they are the real-time part.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::domain::StationQuery;

use super::client::{MIN_QUERY_CHARS, TransitClient};
use super::error::TransitError;
use super::types::{LocationSuggestion, StationBoardResponse};

/// Cached suggestion list.
type LocationsEntry = Arc<Vec<LocationSuggestion>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 500,
        }
    }
}

/// Transit client with location search caching.
#[derive(Clone)]
pub struct CachedTransitClient {
    client: TransitClient,
    locations: MokaCache<String, LocationsEntry>,
}

impl CachedTransitClient {
    /// Create a new cached client.
    pub fn new(client: TransitClient, config: &CacheConfig) -> Self {
        let locations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { client, locations }
    }

    /// Get a station board. Always goes to the service.
    pub async fn get_station_board(
        &self,
        station: &StationQuery,
        limit: u32,
    ) -> Result<StationBoardResponse, TransitError> {
        self.client.get_station_board(station, limit).await
    }

    /// Search stations by name, using the cache if available.
    ///
    /// Failures are not cached and degrade to an empty list.
    pub async fn get_locations(&self, query: &str) -> Vec<LocationSuggestion> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        if let Some(cached) = self.locations.get(query).await {
            debug!(query, "location cache hit");
            return cached.as_ref().clone();
        }

        match self.client.try_get_locations(query).await {
            Ok(stations) => {
                self.locations
                    .insert(query.to_string(), Arc::new(stations.clone()))
                    .await;
                stations
            }
            Err(e) => {
                warn!(query, error = %e, "location search failed");
                Vec::new()
            }
        }
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.locations.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transit::TransitConfig;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 500);
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn cached(base_url: String) -> CachedTransitClient {
        let client = TransitClient::new(TransitConfig::new().with_base_url(base_url)).unwrap();
        CachedTransitClient::new(client, &CacheConfig::default())
    }

    #[tokio::test]
    async fn repeated_query_hits_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/locations",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({"stations": [{"id": "1", "name": "Zürich HB"}]}))
                }
            }),
        );
        let client = cached(serve(router).await);

        let first = client.get_locations("Zür").await;
        let second = client.get_locations("Zür").await;

        assert_eq!(first, second);
        assert_eq!(first[0].name, "Zürich HB");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/locations",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    StatusCode::BAD_GATEWAY
                }
            }),
        );
        let client = cached(serve(router).await);

        assert!(client.get_locations("Bern").await.is_empty());
        assert!(client.get_locations("Bern").await.is_empty());

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn short_queries_skip_cache_and_service() {
        let client = cached("http://127.0.0.1:9".into());
        assert!(client.get_locations("B").await.is_empty());
        client.locations.run_pending_tasks().await;
        assert_eq!(client.cache_entry_count(), 0);
    }
}
