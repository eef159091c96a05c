#![allow(clippy::must_use_candidate)]

//! Configuration for kiln
//!
//! Loaded from a TOML file with `{{ env.VAR }}` placeholder expansion.
//! Every section is optional; an empty file is a valid configuration.

mod env;
pub mod http;
mod loader;
pub mod ollama;
pub mod telemetry;

use serde::Deserialize;

pub use http::HttpConfig;
pub use ollama::{BASE_URL_ENV, DEFAULT_BASE_URL, OllamaConfig};
pub use telemetry::TelemetryConfig;

/// Top-level kiln configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Ollama server and request defaults
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Shared HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
