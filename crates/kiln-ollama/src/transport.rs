use kiln_config::HttpConfig;

use crate::error::{OllamaError, Result};

/// Build the shared HTTP client
///
/// The total timeout bounds a whole call, including reading a streamed
/// body, so it has to cover the slowest generation the caller expects.
pub fn http_client(config: &HttpConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .user_agent(concat!("kiln/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| OllamaError::Config(format!("failed to build HTTP client: {e}")))
}
