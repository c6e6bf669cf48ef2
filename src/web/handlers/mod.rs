//! HTTP handlers.

pub mod feed;

pub use feed::*;

use std::sync::Arc;

use crate::feed::FeedService;

/// Application state shared by all handlers.
///
/// Immutable after construction; concurrent requests share it without locking.
pub struct AppState {
    /// Builds the feed for each request.
    pub feed: Arc<FeedService>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(feed: Arc<FeedService>) -> Self {
        Self { feed }
    }
}
