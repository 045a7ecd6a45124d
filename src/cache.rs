//! Rendered badge cache
//!
//! Upstream fetches are slow and rate-limited, so finished SVG bodies are
//! cached keyed by service, username and theme. TTL matches the
//! Cache-Control max-age attached to responses, so a client and the server
//! expire together.

use std::time::Duration;

use moka::future::Cache;

#[derive(Clone)]
pub struct BadgeCache {
    inner: Cache<String, String>,
}

impl BadgeCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { inner }
    }

    pub fn key(service: &str, username: &str, theme: &str) -> String {
        format!("{service}:{username}:{theme}")
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: String, svg: String) {
        self.inner.insert(key, svg).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_and_key_shape() {
        let cache = BadgeCache::new(8, 60);
        let key = BadgeCache::key("github", "octocat", "dark");
        assert_eq!(key, "github:octocat:dark");

        assert!(cache.get(&key).await.is_none());
        cache.insert(key.clone(), "<svg/>".to_string()).await;
        assert_eq!(cache.get(&key).await.as_deref(), Some("<svg/>"));
    }
}
