//! hubfeed - Docker Hub tag updates as an Atom feed
//!
//! Watches a set of repositories on the registry, keeps the tags matching a
//! per-repository pattern, and serves them newest first as one Atom feed.

pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{HubFeedError, Result};
pub use feed::{
    aggregate, escape, filter_and_project, render, FeedEntry, FeedMeta, FeedService,
    FeedSettings, HubClient, RepositoryConfig, TagRecord, TagSource,
};
pub use web::{create_router, WebServer};
