use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Error, Result};

struct CacheEntry {
    body: String,
    fetched_at: Instant,
}

/// Fetches the source feed over HTTPS with a TTL response cache.
///
/// The cache is the only cross-request state in the process; it is owned here
/// and shared via `Arc<Fetcher>`, keyed by URL, with entries reused until they
/// outlive the TTL. A stale entry is simply overwritten by the next successful
/// fetch.
pub struct Fetcher {
    client: Client,
    feed_url: String,
    ttl: Duration,
    cache: RwLock<HashMap<String, CacheEntry>>,
}

impl Fetcher {
    pub fn new(feed_url: impl Into<String>, ttl: Duration) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("Starlinks/1.0 (+https://links.jacobwgillespie.com)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            feed_url: feed_url.into(),
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Return the feed body, from cache when fresh. A network failure or
    /// non-success status surfaces as an error; there are no retries.
    pub async fn fetch_feed(&self) -> Result<String> {
        if let Some(body) = self.cached(&self.feed_url).await {
            debug!("Serving feed from cache: {}", self.feed_url);
            return Ok(body);
        }

        info!("Fetching feed: {}", self.feed_url);
        let response = self.client.get(&self.feed_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status));
        }

        let body = response.text().await?;

        let mut cache = self.cache.write().await;
        cache.insert(
            self.feed_url.clone(),
            CacheEntry {
                body: body.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(body)
    }

    async fn cached(&self, url: &str) -> Option<String> {
        let cache = self.cache.read().await;
        cache
            .get(url)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.body.clone())
    }
}
