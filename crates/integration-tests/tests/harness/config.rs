//! Programmatic configuration builder for integration tests

use std::time::Duration;

use kiln_config::{Config, HttpConfig, OllamaConfig};
use kiln_ollama::OllamaClient;
use tokio_util::sync::CancellationToken;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder pointed at `base_url` with short timeouts
    pub fn new(base_url: &str) -> Self {
        Self {
            config: Config {
                ollama: OllamaConfig {
                    base_url: Some(base_url.parse().expect("valid URL")),
                    ..OllamaConfig::default()
                },
                http: HttpConfig {
                    timeout: Duration::from_secs(10),
                    connect_timeout: Duration::from_secs(2),
                    ..HttpConfig::default()
                },
                telemetry: None,
            },
        }
    }

    /// Bound each whole request to `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.http.timeout = timeout;
        self
    }

    /// Build the configuration, checking it the way a loaded file is checked
    pub fn build(self) -> Config {
        self.config.validate().expect("valid test config");
        self.config
    }

    /// Build a client from the configuration
    pub fn client(self) -> OllamaClient {
        OllamaClient::from_config(&self.build()).expect("client builds")
    }

    /// Build a client that aborts when `token` is cancelled
    pub fn cancellable_client(self, token: &CancellationToken) -> OllamaClient {
        self.client().with_cancellation(token.clone())
    }
}
