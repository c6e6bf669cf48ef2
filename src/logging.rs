//! Log setup for hubfeed.
//!
//! Each repository pipeline runs inside a [`pipeline_span`], so every line
//! logged while fetching or filtering carries a `repository` field naming
//! the repository it belongs to.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing::{Span, Subscriber};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{HubFeedError, Result};

/// Span wrapping the fetch and filter of one repository.
pub fn pipeline_span(identifier: &str) -> Span {
    tracing::info_span!("pipeline", repository = %identifier)
}

/// Configured level name to a filter. Unknown names mean `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => LevelFilter::WARN,
        other => other.parse().unwrap_or(LevelFilter::INFO),
    }
}

/// `RUST_LOG` when set, the configured level otherwise.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_filter(level).into())
        .from_env_lossy()
}

/// Open the log file for appending, creating its directory if needed.
///
/// An empty path means console only.
fn open_log_file(path: &str) -> io::Result<Option<File>> {
    if path.is_empty() {
        return Ok(None);
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(Some)
}

fn subscriber<W>(filter: EnvFilter, writer: W, ansi: bool) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true),
        )
        .with(filter)
}

/// Install the global subscriber.
///
/// Logs go to stdout, and are appended to `config.file` when it is set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(&config.level);

    let installed = match open_log_file(&config.file)? {
        Some(file) => subscriber(filter, io::stdout.and(Arc::new(file)), false).try_init(),
        None => subscriber(filter, io::stdout, true).try_init(),
    };

    installed.map_err(|e| HubFeedError::Config(format!("failed to install logger: {e}")))
}

/// Install a stdout-only subscriber. Does nothing if one is already set.
pub fn init_console_only(level: &str) {
    let _ = subscriber(env_filter(level), io::stdout, true).try_init();
}
