//! Tag fetcher for the upstream registry.
//!
//! [`TagSource`] is the seam between the pipeline and the registry;
//! [`HubClient`] is the HTTP implementation used in production.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::RegistryConfig;
use crate::error::{HubFeedError, Result};
use crate::feed::types::{resolve_slug, TagListResponse, TagRecord};

/// User agent string for registry requests.
const USER_AGENT: &str = concat!("hubfeed/", env!("CARGO_PKG_VERSION"));

/// A source of repository tags.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Fetch the first page of tags of a repository.
    async fn fetch_tags(&self, identifier: &str) -> Result<Vec<TagRecord>>;

    /// Human-facing tag listing of a repository.
    fn listing_url(&self, identifier: &str) -> String;
}

/// Registry API client.
pub struct HubClient {
    client: Client,
    api_url: Url,
    web_url: Url,
    page_size: u32,
    max_response_bytes: u64,
}

impl HubClient {
    /// Create a new client from the registry configuration.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HubFeedError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: base_url("registry.api_url", &config.api_url)?,
            web_url: base_url("registry.web_url", &config.web_url)?,
            page_size: config.page_size,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// URL of the tag-listing endpoint for a repository.
    pub fn tags_url(&self, identifier: &str) -> Url {
        let slug = resolve_slug(identifier);
        let segments = ["v2", "repositories"]
            .into_iter()
            .chain(slug.split('/'))
            .chain(["tags"]);

        let mut url = join_segments(&self.api_url, segments);
        url.query_pairs_mut()
            .append_pair("page_size", &self.page_size.to_string());
        url
    }
}

fn base_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| HubFeedError::Config(format!("{} is not a valid URL: {}", field, e)))?;
    if url.cannot_be_a_base() {
        return Err(HubFeedError::Config(format!(
            "{} cannot be used as a base URL",
            field
        )));
    }
    Ok(url)
}

/// Append percent-encoded `segments` and a trailing slash to the path of `base`.
fn join_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments).push("");
    }
    url
}

#[async_trait]
impl TagSource for HubClient {
    async fn fetch_tags(&self, identifier: &str) -> Result<Vec<TagRecord>> {
        let url = self.tags_url(identifier);
        debug!("Fetching tags for {} from {}", identifier, url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HubFeedError::fetch(identifier, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(HubFeedError::fetch(
                identifier,
                format!("HTTP error: {}", response.status()),
            ));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_response_bytes {
                return Err(HubFeedError::fetch(
                    identifier,
                    format!(
                        "response too large: {} bytes (max {} bytes)",
                        content_length, self.max_response_bytes
                    ),
                ));
            }
        }

        // Chunked bodies carry no length, so the cap is enforced while reading.
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| HubFeedError::fetch(identifier, format!("failed to read response: {}", e)))?
        {
            if (bytes.len() + chunk.len()) as u64 > self.max_response_bytes {
                return Err(HubFeedError::fetch(
                    identifier,
                    format!(
                        "response too large: exceeds {} bytes",
                        self.max_response_bytes
                    ),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let body: TagListResponse = serde_json::from_slice(&bytes)
            .map_err(|e| HubFeedError::fetch(identifier, format!("invalid response body: {}", e)))?;

        debug!("Fetched {} tag(s) for {}", body.results.len(), identifier);
        Ok(body.results)
    }

    fn listing_url(&self, identifier: &str) -> String {
        let slug = resolve_slug(identifier);
        let segments = ["r"].into_iter().chain(slug.split('/')).chain(["tags"]);
        join_segments(&self.web_url, segments).to_string()
    }
}
