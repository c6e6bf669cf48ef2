use std::sync::Arc;

use tracing::{error, info};

use hubfeed::{Config, FeedService, WebServer};

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "HUBFEED_CONFIG";

#[tokio::main]
async fn main() {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());

    // Logging is not up yet, so configuration errors go to stderr.
    let config = match Config::load_validated(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    if let Err(e) = hubfeed::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        hubfeed::logging::init_console_only(&config.logging.level);
    }

    info!("hubfeed - Docker Hub tag updates");
    info!(
        "Watching {} repositories, serving on {}:{}",
        config.repositories.len(),
        config.server.host,
        config.server.port
    );

    let feed = match FeedService::from_config(&config) {
        Ok(feed) => Arc::new(feed),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config.server, feed) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Feed server stopped: {}", e);
        std::process::exit(1);
    }
}
