use std::io::ErrorKind;
use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, placeholder expansion
    /// fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Load configuration, treating a missing file as an empty one
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match std::fs::metadata(path) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            _ => Self::load(path),
        }
    }

    /// Parse configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if placeholder expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_placeholders(raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is usable
    ///
    /// Sampling parameters are deliberately absent here: range checks
    /// belong to the model server.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-HTTP base URL, zero timeouts, an empty
    /// connection pool, or an out-of-range trace sampling rate
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_ollama()?;
        self.validate_http()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_ollama(&self) -> anyhow::Result<()> {
        if let Some(url) = &self.ollama.base_url
            && !matches!(url.scheme(), "http" | "https")
        {
            anyhow::bail!("ollama.base_url must use http or https, got `{}`", url.scheme());
        }

        if self.ollama.model.as_deref().is_some_and(|m| m.trim() != m) {
            anyhow::bail!("ollama.model must not have leading or trailing whitespace");
        }

        Ok(())
    }

    fn validate_http(&self) -> anyhow::Result<()> {
        if self.http.timeout.is_zero() {
            anyhow::bail!("http.timeout must be greater than 0");
        }

        if self.http.connect_timeout.is_zero() {
            anyhow::bail!("http.connect_timeout must be greater than 0");
        }

        if self.http.pool_max_idle_per_host == 0 {
            anyhow::bail!("http.pool_max_idle_per_host must be greater than 0");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(tracing) = self.telemetry.as_ref().and_then(|t| t.tracing.as_ref()) else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&tracing.sampling_rate) {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0");
        }

        Ok(())
    }
}
