#![allow(clippy::must_use_candidate)]

mod env;
pub mod imagegen;
mod loader;
pub mod telemetry;

use serde::Deserialize;

pub use env::ExpandError;
pub use imagegen::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level promptpix configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Upstream image generation settings
    pub imagegen: ImageGenConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
