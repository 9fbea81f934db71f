use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::fetcher::NewsFetcher;
use crate::models::Article;

#[derive(Default)]
struct CacheState {
    articles: Vec<Article>,
    last_refresh: Option<Instant>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl CacheState {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.last_refresh
            .map(|at| at.elapsed() <= ttl)
            .unwrap_or(false)
    }
}

/// Snapshot of the cache for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub article_count: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub ttl_seconds: u64,
    pub fresh: bool,
}

/// Time-windowed cache in front of [`NewsFetcher`].
///
/// The state lock is held for the whole refresh, so at most one fetch cycle
/// runs at a time and callers arriving mid-refresh wait for its result.
pub struct NewsCache {
    fetcher: NewsFetcher,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl NewsCache {
    pub fn new(fetcher: NewsFetcher, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn fetcher(&self) -> &NewsFetcher {
        &self.fetcher
    }

    /// Returns the cached articles, refreshing them first if the TTL has lapsed.
    pub async fn get_articles(&self) -> Vec<Article> {
        let mut state = self.state.lock().await;

        if state.is_fresh(self.ttl) {
            debug!(refreshed_at = ?state.refreshed_at, "serving cached articles");
            return state.articles.clone();
        }

        let outcome = self.fetcher.fetch_default().await;

        if outcome.is_total_failure() && state.last_refresh.is_some() {
            warn!(
                failed = outcome.failures.len(),
                "all feeds failed; keeping {} cached articles",
                state.articles.len()
            );
        } else {
            state.articles = outcome.articles;
        }

        // Advance even on total failure so a dead upstream is retried once per window
        let now = Instant::now();
        state.last_refresh = Some(state.last_refresh.map_or(now, |prev| prev.max(now)));
        let refreshed_at = Utc::now();
        state.refreshed_at = Some(refreshed_at);
        info!(%refreshed_at, articles = state.articles.len(), "cache refreshed");

        state.articles.clone()
    }

    /// Reports the cache state without triggering a refresh. Waits if a refresh is running.
    pub async fn status(&self) -> CacheStatus {
        let state = self.state.lock().await;
        CacheStatus {
            article_count: state.articles.len(),
            refreshed_at: state.refreshed_at,
            ttl_seconds: self.ttl.as_secs(),
            fresh: state.is_fresh(self.ttl),
        }
    }
}
