//! Tracing subscriber setup

use std::env;
use std::io;

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` when set, the configured level otherwise
fn env_filter(level: &str) -> EnvFilter {
    env::var("RUST_LOG")
        .map_or_else(|_| EnvFilter::new(level), |directive| EnvFilter::new(&directive))
        .add_directive(
            "hyper=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "reqwest=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "fjall=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
}

/// Install the global subscriber. Logs go to stderr so command output
/// on stdout stays machine-readable.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(&config.level));

    let result = if config.format == "json" {
        let json_layer = fmt::layer()
            .with_target(true)
            .with_writer(io::stderr)
            .json();
        registry.with(json_layer).try_init()
    } else {
        let pretty_layer = fmt::layer().with_target(true).with_writer(io::stderr);
        registry.with(pretty_layer).try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    tracing::debug!(
        log.level = %config.level,
        log.format = %config.format,
        "Logging initialized"
    );
    Ok(())
}
