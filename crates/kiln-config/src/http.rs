use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Shared HTTP transport settings
///
/// The defaults describe the long-timeout client used for generation:
/// a local model can take minutes to produce a full reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Total time allowed for one request, including reading the body
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Time allowed to establish a connection
    #[serde(default = "default_connect_timeout", deserialize_with = "deserialize_duration")]
    pub connect_timeout: Duration,
    /// How long idle pooled connections are kept
    #[serde(default = "default_pool_idle_timeout", deserialize_with = "deserialize_duration")]
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections kept per host
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            pool_idle_timeout: default_pool_idle_timeout(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
        }
    }
}

/// Parse human-readable durations such as `"90s"` or `"15m"`
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}

const fn default_timeout() -> Duration {
    Duration::from_secs(15 * 60)
}

const fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

const fn default_pool_idle_timeout() -> Duration {
    Duration::from_secs(90)
}

const fn default_pool_max_idle_per_host() -> usize {
    10
}
