//! Tag-update feed pipeline.
//!
//! Fetches the tags of every configured repository concurrently, keeps the
//! ones matching each repository's pattern, and renders them newest first as
//! an Atom feed.

pub mod aggregator;
pub mod escape;
pub mod fetcher;
pub mod filter;
pub mod render;
pub mod service;
pub mod types;

pub use aggregator::{aggregate, sort_newest_first};
pub use escape::{escape, Escaped};
pub use fetcher::{HubClient, TagSource};
pub use filter::filter_and_project;
pub use render::{render, ATOM_NAMESPACE};
pub use service::{FeedService, FeedSettings};
pub use types::{
    resolve_slug, FeedEntry, FeedMeta, RepositoryConfig, TagListResponse, TagRecord,
    ATOM_CONTENT_TYPE, DEFAULT_PAGE_SIZE, OFFICIAL_NAMESPACE,
};
