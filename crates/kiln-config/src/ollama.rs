use serde::Deserialize;
use url::Url;

/// Server address used when neither the config file nor the environment names one
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Environment variable consulted for the server address
pub const BASE_URL_ENV: &str = "OLLAMA_URL";

/// Ollama server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Server base URL; falls back to `OLLAMA_URL`, then [`DEFAULT_BASE_URL`]
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Default model; unset selects the most recently modified local model
    #[serde(default)]
    pub model: Option<String>,
    /// Stream responses by default
    #[serde(default = "default_stream")]
    pub stream: bool,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: None,
            stream: default_stream(),
        }
    }
}

impl OllamaConfig {
    /// Resolve the server base URL
    ///
    /// Precedence is the configured value, then a non-empty `OLLAMA_URL`,
    /// then `http://localhost:11434`.
    ///
    /// # Errors
    ///
    /// Returns an error if `OLLAMA_URL` is set but is not a valid URL
    pub fn resolve_base_url(&self) -> anyhow::Result<Url> {
        if let Some(url) = &self.base_url {
            return Ok(url.clone());
        }

        let from_env = std::env::var(BASE_URL_ENV).ok().filter(|v| !v.trim().is_empty());
        let raw = from_env.as_deref().unwrap_or(DEFAULT_BASE_URL);

        Url::parse(raw.trim()).map_err(|e| anyhow::anyhow!("invalid {BASE_URL_ENV} value `{raw}`: {e}"))
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_stream() -> bool {
    true
}
