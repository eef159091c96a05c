/// Client-specific result type
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Errors from the Ollama client
///
/// No variant carries partially generated text: a failed call produces
/// nothing the caller could mistake for a complete answer.
#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    /// The model catalog could not be fetched or decoded
    #[error("model catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The catalog was reachable but lists no models
    #[error("no models available")]
    NoModelsAvailable,

    /// The chat request could not be serialized
    #[error("failed to encode chat request: {0}")]
    RequestBuild(#[source] serde_json::Error),

    /// HTTP transport error while sending a request or reading a full body
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The chat endpoint answered with a non-200 status
    #[error("ollama error ({status}): {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// A non-streaming response body was not a chat response
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A streamed line was not a chat chunk
    #[error("failed to parse stream chunk on line {line}: {source}")]
    StreamDecode {
        /// One-based line number within the response body
        line: usize,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The response stream failed before completion
    #[error("stream reading error: {0}")]
    StreamRead(#[source] std::io::Error),

    /// The call was cancelled through the client's cancellation token
    #[error("request cancelled")]
    Cancelled,

    /// The client could not be constructed
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl OllamaError {
    /// Short machine-readable label, used for metric attributes
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CatalogUnavailable(_) => "catalog_unavailable",
            Self::NoModelsAvailable => "no_models_available",
            Self::RequestBuild(_) => "request_build",
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::Decode(_) => "decode",
            Self::StreamDecode { .. } => "stream_decode",
            Self::StreamRead(_) => "stream_read",
            Self::Cancelled => "cancelled",
            Self::Config(_) => "config",
        }
    }

    /// Whether the call ended because it was cancelled
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
