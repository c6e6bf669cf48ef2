//! Concurrent aggregation of repository pipelines.

use futures::future::try_join_all;
use tracing::{debug, warn, Instrument};

use crate::error::{HubFeedError, Result};
use crate::feed::fetcher::TagSource;
use crate::feed::filter::filter_and_project;
use crate::feed::types::{FeedEntry, RepositoryConfig};
use crate::logging::pipeline_span;

/// Fetch and filter every repository concurrently, then merge the entries
/// newest first.
///
/// All pipelines run at once. The first failure aborts the batch: pending
/// pipelines are dropped and the error is returned wrapped in
/// [`HubFeedError::Aggregate`]. Entries with the same timestamp keep the
/// order of `repositories` and then of the registry's response.
pub async fn aggregate(
    source: &dyn TagSource,
    repositories: &[RepositoryConfig],
) -> Result<Vec<FeedEntry>> {
    debug!("Aggregating {} repositories", repositories.len());

    let pipelines = repositories
        .iter()
        .map(|repo| run_pipeline(source, repo).instrument(pipeline_span(&repo.identifier)));

    let per_repository = try_join_all(pipelines).await.map_err(|e| {
        warn!(
            repository = e.repository().unwrap_or("-"),
            "Repository pipeline failed, discarding batch"
        );
        HubFeedError::Aggregate(Box::new(e))
    })?;

    let mut entries: Vec<FeedEntry> = per_repository.into_iter().flatten().collect();
    sort_newest_first(&mut entries);

    Ok(entries)
}

/// Fetch one repository and project its matching tags.
async fn run_pipeline(source: &dyn TagSource, repo: &RepositoryConfig) -> Result<Vec<FeedEntry>> {
    let tags = source.fetch_tags(&repo.identifier).await?;
    filter_and_project(repo, &tags, &source.listing_url(&repo.identifier))
}

/// Stable sort by `published`, newest first.
pub fn sort_newest_first(entries: &mut [FeedEntry]) {
    entries.sort_by(|a, b| b.published.cmp(&a.published));
}
