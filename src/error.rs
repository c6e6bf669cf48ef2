//! Error types for hubfeed.

use thiserror::Error;

/// Common error type for hubfeed.
#[derive(Error, Debug)]
pub enum HubFeedError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    ///
    /// Raised while loading or validating the configuration at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A repository's filter pattern failed to compile.
    #[error("invalid filter pattern for {repository}: {source}")]
    Pattern {
        /// Repository the pattern belongs to.
        repository: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Fetching the tag list of a repository failed.
    #[error("failed to fetch tags for {repository}: {reason}")]
    Fetch {
        /// Repository being fetched.
        repository: String,
        /// What went wrong (network, HTTP status, body decoding).
        reason: String,
    },

    /// One repository pipeline failed, so the whole aggregation failed.
    #[error("aggregation failed: {0}")]
    Aggregate(Box<HubFeedError>),
}

impl HubFeedError {
    /// Create a fetch error for the given repository.
    pub fn fetch(repository: impl Into<String>, reason: impl Into<String>) -> Self {
        HubFeedError::Fetch {
            repository: repository.into(),
            reason: reason.into(),
        }
    }

    /// The repository a pipeline error is attributed to, if any.
    pub fn repository(&self) -> Option<&str> {
        match self {
            HubFeedError::Pattern { repository, .. } | HubFeedError::Fetch { repository, .. } => {
                Some(repository.as_str())
            }
            HubFeedError::Aggregate(inner) => inner.repository(),
            _ => None,
        }
    }
}

/// Result type alias for hubfeed operations.
pub type Result<T> = std::result::Result<T, HubFeedError>;
