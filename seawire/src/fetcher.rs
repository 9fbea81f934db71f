use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::categorize::assign_categories;
use crate::ingestion::{FeedEntry, FeedRetriever};
use crate::models::Article;

/// Source name used when a feed does not declare a title.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// A source that contributed no entries to a fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub url: String,
    pub reason: String,
}

/// Result of one fetch cycle over every configured source.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Feed-declaration order, then entry order within each feed
    pub articles: Vec<Article>,
    pub failures: Vec<SourceFailure>,
    /// Number of sources attempted
    pub sources: usize,
}

impl FetchOutcome {
    /// True when every source failed, so the empty result says nothing about the feeds.
    pub fn is_total_failure(&self) -> bool {
        self.sources > 0 && self.failures.len() == self.sources
    }
}

/// Fetches the configured feeds and turns their entries into categorized articles.
pub struct NewsFetcher {
    retriever: Arc<dyn FeedRetriever>,
    sources: Vec<String>,
    limit_per_feed: usize,
    source_timeout: Duration,
}

impl NewsFetcher {
    pub fn new(
        retriever: Arc<dyn FeedRetriever>,
        sources: Vec<String>,
        limit_per_feed: usize,
        source_timeout: Duration,
    ) -> Self {
        Self {
            retriever,
            sources,
            limit_per_feed,
            source_timeout,
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Fetch cycle with the configured per-feed limit.
    pub async fn fetch_default(&self) -> FetchOutcome {
        self.fetch_articles(self.limit_per_feed).await
    }

    /// Fetches each source in order, keeping at most `limit_per_feed` entries per feed.
    /// A source that errors or exceeds the timeout is logged and skipped.
    pub async fn fetch_articles(&self, limit_per_feed: usize) -> FetchOutcome {
        let mut outcome = FetchOutcome {
            sources: self.sources.len(),
            ..Default::default()
        };

        for url in &self.sources {
            let result = tokio::time::timeout(self.source_timeout, self.retriever.retrieve(url)).await;

            let feed = match result {
                Ok(Ok(feed)) => feed,
                Ok(Err(e)) => {
                    warn!(source = %url, "skipping feed: {:#}", e);
                    outcome.failures.push(SourceFailure {
                        url: url.clone(),
                        reason: format!("{:#}", e),
                    });
                    continue;
                }
                Err(_) => {
                    warn!(source = %url, timeout = ?self.source_timeout, "skipping feed: timed out");
                    outcome.failures.push(SourceFailure {
                        url: url.clone(),
                        reason: format!("timed out after {:?}", self.source_timeout),
                    });
                    continue;
                }
            };

            let source = feed.title.as_deref().unwrap_or(UNKNOWN_SOURCE);
            let before = outcome.articles.len();
            outcome.articles.extend(
                feed.entries
                    .into_iter()
                    .take(limit_per_feed)
                    .map(|entry| build_article(entry, source)),
            );
            debug!(source = %url, "took {} entries from '{}'", outcome.articles.len() - before, source);
        }

        info!(
            "fetched {} articles from {}/{} feeds",
            outcome.articles.len(),
            outcome.sources - outcome.failures.len(),
            outcome.sources
        );
        outcome
    }
}

/// Normalizes one feed entry: decodes HTML entities in the summary and assigns categories.
pub fn build_article(entry: FeedEntry, source: &str) -> Article {
    let summary = entry
        .summary
        .as_deref()
        .map(|s| html_escape::decode_html_entities(s).into_owned())
        .unwrap_or_default();
    let categories = assign_categories(&entry.title, &summary);

    Article {
        title: entry.title,
        link: entry.link,
        summary,
        source: source.to_string(),
        categories,
    }
}
