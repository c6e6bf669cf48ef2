//! Tag filtering and projection into feed entries.

use regex::Regex;
use tracing::debug;

use crate::error::{HubFeedError, Result};
use crate::feed::types::{FeedEntry, RepositoryConfig, TagRecord};

/// Keep the tags whose name matches the repository's pattern and turn them
/// into feed entries linking to `listing_url`.
///
/// The pattern is searched anywhere in the tag name; use `^`/`$` to anchor.
pub fn filter_and_project(
    repo: &RepositoryConfig,
    tags: &[TagRecord],
    listing_url: &str,
) -> Result<Vec<FeedEntry>> {
    let filter = Regex::new(&repo.filter_pattern).map_err(|source| HubFeedError::Pattern {
        repository: repo.identifier.clone(),
        source,
    })?;

    let entries: Vec<FeedEntry> = tags
        .iter()
        .filter(|tag| filter.is_match(&tag.name))
        .map(|tag| FeedEntry::new(&repo.identifier, tag, listing_url))
        .collect();

    debug!(
        "{}: {} of {} tag(s) match {:?}",
        repo.identifier,
        entries.len(),
        tags.len(),
        repo.filter_pattern
    );

    Ok(entries)
}
