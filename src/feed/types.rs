//! Feed types for hubfeed.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Default number of tags requested per repository.
pub const DEFAULT_PAGE_SIZE: u32 = 250;

/// Namespace used by the registry for official images.
pub const OFFICIAL_NAMESPACE: &str = "library";

/// Content type of the rendered feed.
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml; charset=utf-8";

/// A watched repository and the pattern its tags must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Repository identifier, `name` or `namespace/name`.
    pub identifier: String,
    /// Regular expression source applied to tag names.
    pub filter_pattern: String,
}

impl RepositoryConfig {
    /// Create a new repository configuration.
    pub fn new(identifier: impl Into<String>, filter_pattern: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            filter_pattern: filter_pattern.into(),
        }
    }

    /// The `namespace/name` path of this repository on the registry.
    pub fn slug(&self) -> String {
        resolve_slug(&self.identifier)
    }
}

/// Resolve a repository identifier into its `namespace/name` path.
///
/// Bare names are official images and live under the `library` namespace.
pub fn resolve_slug(identifier: &str) -> String {
    if identifier.contains('/') {
        identifier.to_string()
    } else {
        format!("{}/{}", OFFICIAL_NAMESPACE, identifier)
    }
}

/// A tag as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagRecord {
    /// Tag name.
    pub name: String,
    /// When the tag was last pushed.
    pub last_updated: DateTime<Utc>,
}

/// Body of the registry's tag-listing endpoint.
#[derive(Debug, Deserialize)]
pub struct TagListResponse {
    /// Tags on the requested page.
    pub results: Vec<TagRecord>,
}

/// One entry of the rendered feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Repository identifier as configured.
    pub repo: String,
    /// `"{repo} {tag}"`.
    pub title: String,
    /// When the tag was last pushed.
    pub published: DateTime<Utc>,
    /// Human-facing tag listing of the repository.
    pub url: String,
}

impl FeedEntry {
    /// Build an entry for a matching tag of `repo`.
    pub fn new(repo: &str, tag: &TagRecord, url: impl Into<String>) -> Self {
        Self {
            repo: repo.to_string(),
            title: format!("{} {}", repo, tag.name),
            published: tag.last_updated,
            url: url.into(),
        }
    }
}

/// Feed-level metadata.
#[derive(Debug, Clone)]
pub struct FeedMeta {
    /// Feed title.
    pub title: String,
    /// URL the feed is served from.
    pub self_link: String,
    /// Registry home page.
    pub alternate_link: String,
    /// Feed id.
    pub id: String,
    /// When the document was generated.
    pub generated_at: DateTime<Utc>,
}
