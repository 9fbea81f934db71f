/*!
common/src/lib.rs

Shared configuration types for Seawire.

This file provides:
- Config data structures (deserialized from TOML), every key optional
- The compiled-in defaults (feed list, cache TTL, listen address)
- An async loader that layers an override file on top of a default file
*/

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Maritime news feeds polled when no `[feeds]` section overrides them.
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://www.marinelink.com/rss/allnews",
    "https://www.seatrade-maritime.com/rss.xml",
    "https://splash247.com/feed/",
    "https://gcaptain.com/feed/",
    "https://www.marinetraffic.com/en/maritime-news/rss",
];

pub const DEFAULT_LIMIT_PER_FEED: usize = 3;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Seawire/0.1.0";

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0" or "127.0.0.1"
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Feed sources and how many entries to keep from each
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedsConfig {
    /// Feed URLs, polled in this order
    pub urls: Vec<String>,
    pub limit_per_feed: usize,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            urls: DEFAULT_FEEDS.iter().map(|u| u.to_string()).collect(),
            limit_per_feed: DEFAULT_LIMIT_PER_FEED,
        }
    }
}

/// Article cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a completed refresh stays fresh
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Politeness / fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolitenessConfig {
    /// Upper bound for a single source, retries included
    pub fetch_timeout_seconds: u64,
    /// Total attempts per source (1 = no retry)
    pub max_attempts: u32,
    pub user_agent: String,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECS,
            max_attempts: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PolitenessConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub feeds: FeedsConfig,
    pub cache: CacheConfig,
    pub politeness: PolitenessConfig,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence). Keys absent
    /// from both files fall back to the compiled-in defaults.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for (path, label) in [(default_path, "default"), (override_path, "override")] {
            let Some(path) = path else { continue };
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {} config: {}", label, path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse {} configuration", label))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.feeds.urls.is_empty() {
            bail!("feeds.urls must list at least one feed");
        }
        for raw in &self.feeds.urls {
            let parsed = url::Url::parse(raw).with_context(|| format!("invalid feed URL: {}", raw))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!("feed URL must be http or https: {}", raw);
            }
        }
        if self.feeds.limit_per_feed == 0 {
            bail!("feeds.limit_per_feed must be at least 1");
        }
        if self.cache.ttl_seconds == 0 {
            bail!("cache.ttl_seconds must be at least 1");
        }
        if self.politeness.fetch_timeout_seconds == 0 {
            bail!("politeness.fetch_timeout_seconds must be at least 1");
        }
        if self.politeness.max_attempts == 0 {
            bail!("politeness.max_attempts must be at least 1");
        }
        Ok(())
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").expect("parse empty config");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.server.port, 5050);
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.feeds.urls.len(), 5);
        assert_eq!(cfg.feeds.limit_per_feed, 3);
        assert_eq!(cfg.cache.ttl(), Duration::from_secs(300));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let toml = r#"
            [server]
            port = 8080

            [feeds]
            urls = ["https://example.com/rss"]
        "#;

        let cfg: Config = toml::from_str(toml).expect("parse config");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.bind, DEFAULT_BIND);
        assert_eq!(cfg.feeds.urls, vec!["https://example.com/rss".to_string()]);
        assert_eq!(cfg.feeds.limit_per_feed, DEFAULT_LIMIT_PER_FEED);
        assert_eq!(cfg.politeness.max_attempts, 1);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.feeds.urls = vec!["not a url".into()];
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.feeds.urls = vec!["ftp://example.com/feed".into()];
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.feeds.urls.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.feeds.limit_per_feed = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.cache.ttl_seconds = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.politeness.max_attempts = 0;
        assert!(cfg.validate().is_err());
    }

    #[tokio::test]
    async fn override_file_wins_over_default_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let override_path = dir.path().join("config.toml");

        fs::write(
            &default_path,
            r#"
            [server]
            bind = "127.0.0.1"
            port = 6000

            [cache]
            ttl_seconds = 120
            "#,
        )
        .expect("write default");
        fs::write(
            &override_path,
            r#"
            [server]
            port = 7000
            "#,
        )
        .expect("write override");

        let cfg = Config::load_with_defaults(Some(&default_path), Some(&override_path))
            .await
            .expect("load config");
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.cache.ttl_seconds, 120);
        assert_eq!(cfg.feeds, FeedsConfig::default());
    }

    #[tokio::test]
    async fn missing_files_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");

        let cfg = Config::load_with_defaults(Some(&missing), None)
            .await
            .expect("load config");
        assert_eq!(cfg, Config::default());
    }

    #[tokio::test]
    async fn from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[server\nport = ").expect("write broken");

        let err = Config::from_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }
}
