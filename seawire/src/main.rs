/*
seawire - single-binary main.rs
This binary loads configuration, wires the feed fetcher and article cache together
and serves them through the Rocket HTTP server.
*/

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use common::Config;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use seawire::cache::NewsCache;
use seawire::fetcher::NewsFetcher;
use seawire::ingestion::HttpFeedRetriever;
use seawire::server::launch_rocket;

#[derive(Parser, Debug)]
#[command(name = "seawire", about = "Seawire maritime news aggregator")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the listen address from the config
    #[arg(long)]
    bind: Option<String>,

    /// Override the listen port from the config
    #[arg(long)]
    port: Option<u16>,

    /// Fetch all feeds once before accepting requests
    #[arg(long)]
    warm: bool,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let mut config = load_config(args.config).await?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Err(e) = config.validate() {
        error!("invalid configuration: {:#}", e);
        return Err(e);
    }
    info!(
        feeds = config.feeds.urls.len(),
        limit_per_feed = config.feeds.limit_per_feed,
        ttl_seconds = config.cache.ttl_seconds,
        "configuration loaded"
    );

    let retriever = HttpFeedRetriever::new(&config.politeness)?;
    let fetcher = NewsFetcher::new(
        Arc::new(retriever),
        config.feeds.urls.clone(),
        config.feeds.limit_per_feed,
        config.politeness.fetch_timeout(),
    );
    let cache = Arc::new(NewsCache::new(fetcher, config.cache.ttl()));

    if args.warm {
        info!("Warming article cache before launch");
        let articles = cache.get_articles().await;
        info!("cache warmed with {} articles", articles.len());
    }

    if let Err(e) = launch_rocket(cache, &config.server).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}

/// Layers `--config FILE` (or ./config.toml) over ./config.default.toml; both optional.
async fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = explicit {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let config = match Config::load_with_defaults(
        default_path.exists().then_some(default_path.as_path()),
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load configuration: {:#}", e);
            return Err(e);
        }
    };
    info!(default_file = ?default_path, override_file = ?override_path, "configuration files resolved");
    Ok(config)
}
