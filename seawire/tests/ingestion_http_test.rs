use common::PolitenessConfig;
use seawire::ingestion::{FeedRetriever, HttpFeedRetriever};

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Splash Test</title>
    <link>https://example.com</link>
    <description>Mock feed</description>
    <item>
      <title>Tanker order book grows</title>
      <link>https://example.com/tanker</link>
      <description>Owners &amp;amp; yards sign deals</description>
    </item>
  </channel>
</rss>"#;

fn politeness(max_attempts: u32, timeout_secs: u64) -> PolitenessConfig {
    PolitenessConfig {
        fetch_timeout_seconds: timeout_secs,
        max_attempts,
        user_agent: "seawire-test".to_string(),
    }
}

#[tokio::test]
async fn test_http_retriever_parses_feed() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/feed")
        .match_header("user-agent", "seawire-test")
        .with_status(200)
        .with_header("content-type", "application/rss+xml")
        .with_body(RSS)
        .create_async()
        .await;

    let retriever = HttpFeedRetriever::new(&politeness(1, 5)).expect("build retriever");
    let feed = retriever
        .retrieve(&format!("{}/feed", server.url()))
        .await
        .expect("retrieve feed");

    assert_eq!(feed.title.as_deref(), Some("Splash Test"));
    assert_eq!(feed.entries.len(), 1);
    assert_eq!(feed.entries[0].title, "Tanker order book grows");
    assert_eq!(feed.entries[0].link, "https://example.com/tanker");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_retriever_does_not_retry_client_errors() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let retriever = HttpFeedRetriever::new(&politeness(3, 5)).expect("build retriever");
    let result = retriever.retrieve(&format!("{}/missing", server.url())).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("404"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_retriever_retries_server_errors() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/flaky")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let retriever = HttpFeedRetriever::new(&politeness(2, 5)).expect("build retriever");
    let result = retriever.retrieve(&format!("{}/flaky", server.url())).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("server error"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_retriever_rejects_non_feed_body() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><body>maintenance</body></html>")
        .create_async()
        .await;

    let retriever = HttpFeedRetriever::new(&politeness(1, 5)).expect("build retriever");
    let result = retriever.retrieve(&format!("{}/page", server.url())).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("failed to parse feed"));
}

#[tokio::test]
async fn test_http_retriever_timeout() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/slow")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(std::time::Duration::from_secs(3));
            w.write_all(RSS.as_bytes())
        })
        .create_async()
        .await;

    let retriever = HttpFeedRetriever::new(&politeness(1, 1)).expect("build retriever");
    let result = retriever.retrieve(&format!("{}/slow", server.url())).await;

    assert!(result.is_err());
}
