//! Logging set-up for promptpix
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either
//! the human-readable or the JSON formatter.

use promptpix_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber from configuration
///
/// Log lines go to stderr so they never interleave with generated output.
/// `RUST_LOG` takes precedence over the configured filter; without either,
/// `default_filter` is used. An invalid directive falls back to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<()> {
    let directive = config.map_or(default_filter, |c| c.log_filter.as_str());
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), directive);
    let format = config.map_or(LogFormat::Pretty, |c| c.format);

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Build the filter, preferring an environment override over the configured directive
fn build_filter(env_override: Option<&str>, directive: &str) -> EnvFilter {
    env_override
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
