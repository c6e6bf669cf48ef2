//! Router configuration.

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{serve_feed, AppState};

/// Create the feed router.
///
/// Path and method are not distinguished: every request gets the feed.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(serve_feed)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}
