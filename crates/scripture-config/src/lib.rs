#![allow(clippy::must_use_candidate)]

pub mod api;
mod env;
mod loader;
pub mod telemetry;

use serde::Deserialize;

pub use api::*;
pub use loader::DEFAULT_CONFIG_PATH;
pub use telemetry::*;

/// Top-level Scripture configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Verse API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
