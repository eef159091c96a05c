use std::fmt;
use std::future::Future;
use std::io;
use std::time::Instant;

use futures_util::TryStreamExt;
use kiln_telemetry::KeyValue;
use kiln_telemetry::metrics::record_duration;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::decode::{decode_once, decode_stream};
use crate::encode::{encode_request, to_body};
use crate::error::{OllamaError, Result};
use crate::metrics::ClientMetrics;
use crate::options::GenerationConfig;
use crate::resolve::{is_auto, select_latest};
use crate::transport::http_client;
use crate::types::{ModelCatalogEntry, ModelList};

/// Client for a local Ollama server
///
/// Cheap to clone; clones share the connection pool and the cancellation
/// token. Calls are independent and may run concurrently.
#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: Url,
    cancel: CancellationToken,
    metrics: ClientMetrics,
}

impl fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.base_url.as_str())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl OllamaClient {
    /// Create a client for `base_url` using an existing HTTP client
    pub fn new(base_url: Url, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url,
            cancel: CancellationToken::new(),
            metrics: ClientMetrics::new(),
        }
    }

    /// Create a client from loaded configuration
    ///
    /// The base URL follows configuration, then `OLLAMA_URL`, then the
    /// local default. The HTTP client is built from the `[http]` section.
    pub fn from_config(config: &kiln_config::Config) -> Result<Self> {
        let base_url = config
            .ollama
            .resolve_base_url()
            .map_err(|e| OllamaError::Config(format!("{e:#}")))?;
        let http = http_client(&config.http)?;

        Ok(Self::new(base_url, http))
    }

    /// Abort in-flight and future calls when `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Server base URL
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Query the server's model catalog
    pub async fn list_models(&self) -> Result<Vec<ModelCatalogEntry>> {
        let start = Instant::now();
        let result = self.cancellable(self.fetch_catalog()).await;

        record_duration(
            &self.metrics.catalog_duration,
            start,
            &[KeyValue::new("outcome", outcome(&result))],
        );
        if let Err(e) = &result {
            tracing::warn!(error = %e, "model catalog query failed");
        }

        result
    }

    /// Resolve a requested model name to a concrete one
    ///
    /// An empty name or [`AUTO_MODEL`](crate::AUTO_MODEL) selects the most
    /// recently modified model in the catalog. Any other name is returned
    /// unchanged without checking that the server has it.
    pub async fn resolve_model(&self, requested: &str) -> Result<String> {
        if !is_auto(requested) {
            return Ok(requested.to_owned());
        }

        let models = self.list_models().await?;
        let Some(selected) = select_latest(&models) else {
            tracing::warn!("model catalog is empty");
            return Err(OllamaError::NoModelsAvailable);
        };

        tracing::debug!(
            model = %selected.name,
            modified_at = ?selected.modified_at,
            candidates = models.len(),
            "auto-selected model"
        );

        Ok(selected.name.clone())
    }

    /// Single-turn chat with streaming disabled and server-default sampling
    pub async fn chat(&self, prompt: &str, model: &str) -> Result<String> {
        self.chat_with_config(prompt, GenerationConfig::new(model)).await
    }

    /// Single-turn chat
    ///
    /// Returns the full assistant text. When `config.stream` is set the
    /// response is read line by line and each non-empty fragment is passed
    /// to `config.on_fragment` before the next line is read; the returned
    /// text is the concatenation of exactly those fragments. A failed call
    /// returns no text, even if fragments were already delivered.
    pub async fn chat_with_config(&self, prompt: &str, mut config: GenerationConfig<'_>) -> Result<String> {
        let start = Instant::now();
        let mode = if config.stream { "stream" } else { "once" };

        let result = self.cancellable(self.run_chat(prompt, &mut config)).await;

        let attributes = [KeyValue::new("mode", mode), KeyValue::new("outcome", outcome(&result))];
        self.metrics.requests.add(1, &attributes);
        record_duration(&self.metrics.request_duration, start, &attributes);

        match &result {
            Ok(text) => tracing::debug!(
                mode,
                chars = text.chars().count(),
                elapsed_ms = start.elapsed().as_millis(),
                "chat completed"
            ),
            Err(e) => tracing::warn!(mode, error = %e, "chat failed"),
        }

        result
    }

    async fn run_chat(&self, prompt: &str, config: &mut GenerationConfig<'_>) -> Result<String> {
        let model = self.resolve_model(&config.model).await?;
        let request = encode_request(prompt, &model, config);
        let body = to_body(&request)?;

        tracing::debug!(
            model = %request.model,
            stream = request.stream,
            options = ?request.options,
            prompt_chars = prompt.chars().count(),
            "sending chat request"
        );

        // First-fragment latency excludes model resolution
        let sent_at = Instant::now();
        let response = self
            .http
            .post(self.endpoint("/api/chat"))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Server {
                status: status.as_u16(),
                body,
            });
        }

        if !config.stream {
            let body = response.bytes().await?;
            return decode_once(&body);
        }

        let reader = StreamReader::new(Box::pin(response.bytes_stream().map_err(io::Error::other)));
        let sink = &mut config.on_fragment;
        let mut first = true;

        decode_stream(reader, |fragment| {
            if first {
                first = false;
                record_duration(&self.metrics.time_to_first_fragment, sent_at, &[]);
            }
            self.metrics.fragments.add(1, &[]);
            if let Some(sink) = sink.as_mut() {
                sink(fragment);
            }
        })
        .await
    }

    async fn fetch_catalog(&self) -> Result<Vec<ModelCatalogEntry>> {
        let response = self
            .http
            .get(self.endpoint("/api/tags"))
            .send()
            .await
            .map_err(|e| OllamaError::CatalogUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::CatalogUnavailable(format!(
                "server returned {}: {body}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| OllamaError::CatalogUnavailable(format!("failed to read response: {e}")))?;
        let list: ModelList = serde_json::from_slice(&body)
            .map_err(|e| OllamaError::CatalogUnavailable(format!("failed to decode response: {e}")))?;

        Ok(list.models)
    }

    /// Race a network operation against the cancellation token
    async fn cancellable<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(OllamaError::Cancelled),
            out = operation => out,
        }
    }

    /// Append `path` to the base URL, keeping any path prefix
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{path}", url.path().trim_end_matches('/'));
        url.set_path(&joined);
        url
    }
}

fn outcome<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}
