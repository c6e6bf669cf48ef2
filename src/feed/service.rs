//! Feed service: ties the configured repositories, the tag source and the
//! renderer together.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::feed::aggregator::aggregate;
use crate::feed::fetcher::{HubClient, TagSource};
use crate::feed::render::render;
use crate::feed::types::{FeedEntry, FeedMeta, RepositoryConfig};

/// Feed-level settings that do not change between requests.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Feed title.
    pub title: String,
    /// URL the feed is served from; also used as the feed id.
    pub self_link: String,
    /// Registry home page.
    pub alternate_link: String,
}

impl FeedSettings {
    /// Derive the feed settings from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.feed.title.clone(),
            self_link: config.feed_self_link(),
            alternate_link: format!("{}/", config.registry.web_url.trim_end_matches('/')),
        }
    }

    fn meta(&self, generated_at: DateTime<Utc>) -> FeedMeta {
        FeedMeta {
            title: self.title.clone(),
            self_link: self.self_link.clone(),
            alternate_link: self.alternate_link.clone(),
            id: self.self_link.clone(),
            generated_at,
        }
    }
}

/// Builds the aggregated feed. Holds no per-request state.
pub struct FeedService {
    source: Arc<dyn TagSource>,
    repositories: Vec<RepositoryConfig>,
    settings: FeedSettings,
}

impl FeedService {
    /// Create a new feed service.
    pub fn new(
        source: Arc<dyn TagSource>,
        repositories: Vec<RepositoryConfig>,
        settings: FeedSettings,
    ) -> Self {
        Self {
            source,
            repositories,
            settings,
        }
    }

    /// Create a feed service backed by the registry API from the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = HubClient::new(&config.registry)?;
        Ok(Self::new(
            Arc::new(client),
            config.repositories(),
            FeedSettings::from_config(config),
        ))
    }

    /// The repositories this service aggregates.
    pub fn repositories(&self) -> &[RepositoryConfig] {
        &self.repositories
    }

    /// Fetch, filter and merge the tags of every repository.
    pub async fn aggregate(&self) -> Result<Vec<FeedEntry>> {
        aggregate(self.source.as_ref(), &self.repositories).await
    }

    /// Build the feed document, stamped with the current time.
    pub async fn build_document(&self) -> Result<String> {
        self.build_document_at(Utc::now()).await
    }

    /// Build the feed document with the given generation time.
    pub async fn build_document_at(&self, generated_at: DateTime<Utc>) -> Result<String> {
        let entries = self.aggregate().await?;
        info!(
            "Aggregated {} entries from {} repositories",
            entries.len(),
            self.repositories.len()
        );
        Ok(render(&self.settings.meta(generated_at), &entries))
    }
}
