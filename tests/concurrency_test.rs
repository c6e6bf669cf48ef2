//! Concurrency tests.
//!
//! Repository fetches within one request run in parallel, and concurrent
//! requests share no state.

mod common;

use std::future::IntoFuture;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{config_for, create_test_server, parse_feed, start_registry};

/// Serve one tag for `slug` after `delay`.
async fn mock_slow_tags(
    registry: &MockServer,
    slug: &str,
    tag: &str,
    at: &str,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/repositories/{}/tags/", slug)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [{"name": tag, "last_updated": at}]}))
                .set_delay(delay),
        )
        .mount(registry)
        .await;
}

#[tokio::test]
async fn test_repositories_fetched_in_parallel() {
    let registry = start_registry().await;
    let repos = ["a", "b", "c", "d", "e"];
    for (i, repo) in repos.iter().enumerate() {
        mock_slow_tags(
            &registry,
            &format!("library/{}", repo),
            "1.0",
            &format!("2023-01-0{}T00:00:00Z", i + 1),
            Duration::from_millis(300),
        )
        .await;
    }
    let patterns: Vec<(&str, &str)> = repos.iter().map(|r| (*r, ".*")).collect();
    let server = create_test_server(&config_for(&registry, &patterns));

    let started = Instant::now();
    let response = server.get("/").await;
    let elapsed = started.elapsed();

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(parse_feed(&response.text()).entries.len(), 5);
    // Sequential fetching would take at least 1.5s.
    assert!(elapsed < Duration::from_millis(1200), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_order_does_not_depend_on_response_latency() {
    let registry = start_registry().await;
    // The newest tag arrives last.
    mock_slow_tags(
        &registry,
        "library/slow",
        "new",
        "2023-03-01T00:00:00Z",
        Duration::from_millis(250),
    )
    .await;
    mock_slow_tags(
        &registry,
        "library/fast",
        "old",
        "2023-01-01T00:00:00Z",
        Duration::ZERO,
    )
    .await;
    mock_slow_tags(
        &registry,
        "library/mid",
        "mid",
        "2023-02-01T00:00:00Z",
        Duration::from_millis(100),
    )
    .await;
    let server = create_test_server(&config_for(
        &registry,
        &[("slow", ".*"), ("fast", ".*"), ("mid", ".*")],
    ));

    let feed = parse_feed(&server.get("/").await.text());

    let titles: Vec<_> = feed
        .entries
        .iter()
        .map(|e| e.title.as_ref().unwrap().content.clone())
        .collect();
    assert_eq!(titles, vec!["slow new", "mid mid", "fast old"]);
}

#[tokio::test]
async fn test_concurrent_requests_independent() {
    let registry = start_registry().await;
    mock_slow_tags(
        &registry,
        "library/nginx",
        "1.25.3",
        "2023-10-24T00:00:00Z",
        Duration::from_millis(50),
    )
    .await;
    mock_slow_tags(
        &registry,
        "library/redis",
        "7.2.3",
        "2023-11-01T00:00:00Z",
        Duration::from_millis(20),
    )
    .await;
    let server = create_test_server(&config_for(
        &registry,
        &[("nginx", ".*"), ("redis", ".*")],
    ));

    let responses =
        futures::future::join_all((0..10).map(|_| server.get("/").into_future())).await;

    for response in responses {
        assert_eq!(response.status_code(), StatusCode::OK);
        let feed = parse_feed(&response.text());
        let titles: Vec<_> = feed
            .entries
            .iter()
            .map(|e| e.title.as_ref().unwrap().content.clone())
            .collect();
        assert_eq!(titles, vec!["redis 7.2.3", "nginx 1.25.3"]);
    }

    let requests = registry.received_requests().await.unwrap();
    assert_eq!(requests.len(), 20);
}

#[tokio::test]
async fn test_failure_does_not_wait_for_slow_repositories() {
    let registry = start_registry().await;
    mock_slow_tags(
        &registry,
        "library/slow",
        "1.0",
        "2023-01-01T00:00:00Z",
        Duration::from_secs(3),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v2/repositories/library/broken/tags/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&registry)
        .await;
    let server = create_test_server(&config_for(
        &registry,
        &[("broken", ".*"), ("slow", ".*")],
    ));

    let started = Instant::now();
    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.as_bytes().is_empty());
    assert!(started.elapsed() < Duration::from_secs(2));
}
