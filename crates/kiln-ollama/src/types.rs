use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

use crate::options::SamplingOptions;

// -- Chat request types --

/// Body of `POST /api/chat`
///
/// Sampling parameters are flattened into the top level of the JSON
/// object and omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Whether the server should stream the reply line by line
    pub stream: bool,
    /// Sampling parameters
    #[serde(flatten)]
    pub options: SamplingOptions,
}

/// Message in a conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    /// Text content
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_owned(),
            content: content.to_owned(),
        }
    }
}

// -- Chat response types --

/// One decoded response object
///
/// A non-streaming reply is a single chunk; a streamed reply is one chunk
/// per line. Only `message.content` and `done` drive behavior, the timing
/// fields are carried for callers that want them. Unknown fields are
/// ignored and missing ones default to zero or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChatChunk {
    /// Assistant message or message fragment
    #[serde(deserialize_with = "null_as_default")]
    pub message: ChatMessage,
    /// Set on the final chunk
    pub done: bool,
    /// Model that produced the chunk
    pub model: String,
    /// Server timestamp, as sent
    pub created_at: String,
    /// Why generation stopped (final chunk only)
    pub done_reason: String,
    /// Total time spent, in nanoseconds
    pub total_duration: u64,
    /// Time spent loading the model, in nanoseconds
    pub load_duration: u64,
    /// Prompt tokens evaluated
    pub prompt_eval_count: u64,
    /// Time spent evaluating the prompt, in nanoseconds
    pub prompt_eval_duration: u64,
    /// Tokens generated
    pub eval_count: u64,
    /// Time spent generating, in nanoseconds
    pub eval_duration: u64,
}

// -- Model catalog types --

/// Body of `GET /api/tags`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelList {
    /// Locally available models
    #[serde(default, deserialize_with = "null_as_default")]
    pub models: Vec<ModelCatalogEntry>,
}

/// A locally available model
///
/// Only `name` and `modified_at` influence model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalogEntry {
    /// Model name, including tag (e.g. `llama3.1:8b`)
    pub name: String,
    /// Last modification time; absent sorts before any timestamp
    #[serde(default)]
    pub modified_at: Option<Timestamp>,
    /// Size on disk, in bytes
    #[serde(default)]
    pub size: u64,
    /// Content digest
    #[serde(default)]
    pub digest: String,
    /// Descriptive metadata
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: ModelDetails,
}

/// Descriptive model metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDetails {
    /// Weight file format (e.g. `gguf`)
    pub format: String,
    /// Model family
    pub family: String,
    /// All families the model belongs to
    #[serde(deserialize_with = "null_as_default")]
    pub families: Vec<String>,
    /// Human-readable parameter count (e.g. `8.0B`)
    pub parameter_size: String,
    /// Quantization level (e.g. `Q4_0`)
    pub quantization_level: String,
}

/// Deserialize `null` as the type's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
