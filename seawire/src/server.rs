use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{get, options, routes, Build, Rocket, State};

use common::ServerConfig;

use crate::cache::NewsCache;
use crate::models::Article;

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub cache: Arc<NewsCache>,
}

impl AppState {
    pub fn new(cache: Arc<NewsCache>) -> Self {
        Self {
            started_at: Utc::now(),
            cache,
        }
    }
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

/// Aggregated, categorized articles; refreshed lazily when the cache is stale.
#[get("/api/news")]
async fn news(state: &State<AppState>) -> Json<Vec<Article>> {
    Json(state.cache.get_articles().await)
}

/// Status endpoint returning uptime and cache details. Never triggers a fetch.
#[get("/api/status")]
async fn status(state: &State<AppState>) -> Json<serde_json::Value> {
    let uptime = (Utc::now() - state.started_at).num_seconds();
    let cache = state.cache.status().await;

    Json(serde_json::json!({
        "status": "ok",
        "uptime_seconds": uptime,
        "article_count": cache.article_count,
        "last_refresh": cache.refreshed_at.map(|t| t.to_rfc3339()),
        "cache_ttl_seconds": cache.ttl_seconds,
        "cache_fresh": cache.fresh,
        "feeds": state.cache.fetcher().sources(),
    }))
}

/// Answers CORS preflight requests for any path.
#[options("/<_..>")]
async fn preflight() -> Status {
    Status::NoContent
}

/// Allows cross-origin reads from any origin.
fn cors() -> AdHoc {
    AdHoc::on_response("CORS", |_req, res| {
        Box::pin(async move {
            res.set_header(Header::new("Access-Control-Allow-Origin", "*"));
            res.set_header(Header::new("Access-Control-Allow-Methods", "GET, OPTIONS"));
            res.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        })
    })
}

/// Build the Rocket instance with managed state and routes mounted.
pub fn build_rocket(figment: Figment, state: AppState) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(state)
        .attach(cors())
        .mount("/", routes![health, news, status, preflight])
}

/// Runs the HTTP server until Rocket shuts down (SIGINT/SIGTERM etc.).
pub async fn launch_rocket(cache: Arc<NewsCache>, server: &ServerConfig) -> Result<()> {
    let fig = rocket::Config::figment()
        .merge(("address", server.bind.clone()))
        .merge(("port", server.port));

    tracing::info!(bind = %server.bind, port = server.port, "Starting Rocket HTTP server");
    build_rocket(fig, AppState::new(cache))
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
