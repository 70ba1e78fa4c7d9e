//! Logging system demonstration
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run -p core-runtime --example logging_demo
//!
//! # JSON format with a custom filter
//! cargo run -p core-runtime --example logging_demo -- json "logging_demo=trace"
//! ```

use bridge_traits::LogLevel;
use core_runtime::logging::{init_logging, redact_if_sensitive, strip_path, LogFormat, LoggingConfig};
use std::env;
use tracing::{debug, info, instrument, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace);

    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    init_logging(config)?;

    info!(format = ?format, "Logging initialized");

    let token = "ya29.example-access-token";
    info!(
        access_token = %redact_if_sensitive("access_token", token),
        "Session established"
    );

    list_folder("Desserts/Cakes").await;

    Ok(())
}

#[instrument]
async fn list_folder(path: &str) {
    debug!(folder = %strip_path(path), "Listing folder");
    warn!(page = 2, "Listing continued on a further page");
}
