//! Test helpers for integration tests.
//!
//! Provides a mock registry and helpers to build a feed server against it.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hubfeed::web::AppState;
use hubfeed::{create_router, Config, FeedService};

/// Start an empty mock registry.
pub async fn start_registry() -> MockServer {
    MockServer::start().await
}

/// Serve `tags` (pairs of name and `last_updated`) for the repository at `slug`.
pub async fn mock_tags(registry: &MockServer, slug: &str, tags: &[(&str, &str)]) {
    let results: Vec<Value> = tags
        .iter()
        .map(|(name, last_updated)| json!({"name": name, "last_updated": last_updated}))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/v2/repositories/{}/tags/", slug)))
        .and(query_param("page_size", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": results.len(),
            "results": results,
        })))
        .mount(registry)
        .await;
}

/// Answer requests for the repository at `slug` with `status`.
pub async fn mock_failure(registry: &MockServer, slug: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/repositories/{}/tags/", slug)))
        .respond_with(ResponseTemplate::new(status))
        .mount(registry)
        .await;
}

/// Configuration pointing at the mock registry.
pub fn config_for(registry: &MockServer, repositories: &[(&str, &str)]) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 8080;
    config.registry.api_url = registry.uri();
    config.registry.web_url = "https://hub.docker.com".to_string();
    config.registry.total_timeout_secs = 5;
    for (identifier, pattern) in repositories {
        config
            .repositories
            .insert(identifier.to_string(), pattern.to_string());
    }
    config
}

/// Create a test server serving the feed for `config`.
pub fn create_test_server(config: &Config) -> TestServer {
    config.validate().expect("invalid test configuration");
    let feed = FeedService::from_config(config).expect("failed to create feed service");
    let router = create_router(Arc::new(AppState::new(Arc::new(feed))));
    TestServer::new(router).expect("Failed to create test server")
}

/// Parse a served document with a real feed parser.
pub fn parse_feed(body: &str) -> feed_rs::model::Feed {
    feed_rs::parser::parse(body.as_bytes()).expect("served document is not a valid feed")
}
