use anyhow::{Context, Result};
use common::PolitenessConfig;
use feed_rs::model::Feed;
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;

/// A parsed feed reduced to the fields the aggregator uses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeed {
    /// Feed-level title, if the feed declares one
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
}

/// A single item within a parsed feed, before normalization into an article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: Option<String>,
}

impl From<Feed> for ParsedFeed {
    fn from(feed: Feed) -> Self {
        let title = feed
            .title
            .map(|t| t.content)
            .filter(|t| !t.trim().is_empty());

        let entries = feed
            .entries
            .into_iter()
            .map(|entry| FeedEntry {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                // Use the first link as the URL
                link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
                summary: entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body)),
            })
            .collect();

        Self { title, entries }
    }
}

/// Parses raw RSS/Atom bytes.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes).context("failed to parse feed")?;
    Ok(feed.into())
}

/// Source of parsed feeds. Errors describe why a single source could not be
/// retrieved; callers decide how failures aggregate.
#[async_trait::async_trait]
pub trait FeedRetriever: Send + Sync {
    async fn retrieve(&self, url: &str) -> Result<ParsedFeed>;
}

/// Retrieves feeds over HTTP and parses them with `feed-rs`.
pub struct HttpFeedRetriever {
    client: Client,
    max_attempts: u32,
}

impl HttpFeedRetriever {
    pub fn new(politeness: &PolitenessConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(politeness.fetch_timeout())
            .user_agent(politeness.user_agent.as_str())
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            client,
            max_attempts: politeness.max_attempts.max(1),
        })
    }
}

#[async_trait::async_trait]
impl FeedRetriever for HttpFeedRetriever {
    /// Fetches a feed from the given URL and parses it.
    /// Server errors, rate limiting and network errors are retried with
    /// exponential backoff up to `max_attempts`; client errors are not.
    async fn retrieve(&self, url: &str) -> Result<ParsedFeed> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let backoff = Duration::from_secs(2u64.pow(attempt - 2)); // 1s, 2s, 4s...
                tracing::info!("Retrying feed fetch for {} (attempt {}/{}) after {:?}...", url, attempt, self.max_attempts, backoff);
                tokio::time::sleep(backoff).await;
            }

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let bytes = response.bytes().await.context("failed to read response body")?;
                        return parse_feed(bytes.as_ref());
                    } else if status.is_server_error() {
                        last_error = Some(anyhow::anyhow!("server error: {}", status));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(anyhow::anyhow!("rate limited: {}", status));
                    } else {
                        // 4xx other than 429 is permanent
                        return Err(anyhow::anyhow!("feed fetch failed with status: {}", status));
                    }
                }
                Err(e) => {
                    last_error = Some(anyhow::Error::new(e).context("network error during fetch"));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error after retries")))
    }
}
