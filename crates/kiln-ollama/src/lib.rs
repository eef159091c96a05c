#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Chat completions from a local Ollama server
//!
//! A call resolves the model (asking the server's catalog when the caller
//! leaves the choice to it), sends a single-turn chat request, and either
//! decodes one JSON reply or reads a line-delimited stream, handing each
//! text fragment to the caller as it arrives.
//!
//! ```no_run
//! # async fn run() -> kiln_ollama::Result<()> {
//! use kiln_ollama::{GenerationConfig, OllamaClient};
//!
//! let client = OllamaClient::from_config(&kiln_config::Config::default())?;
//! let config = GenerationConfig::new("llama3.1:8b")
//!     .streaming(true)
//!     .on_fragment(|fragment| print!("{fragment}"));
//! let answer = client.chat_with_config("Why is the sky blue?", config).await?;
//! # drop(answer);
//! # Ok(())
//! # }
//! ```

mod client;
mod decode;
mod encode;
mod error;
mod metrics;
mod options;
mod resolve;
mod transport;
mod types;

pub use client::OllamaClient;
pub use decode::{decode_once, decode_stream};
pub use encode::encode_request;
pub use error::{OllamaError, Result};
pub use options::{FragmentSink, GenerationConfig, SamplingOptions};
pub use resolve::{AUTO_MODEL, is_auto, select_latest};
pub use transport::http_client;
pub use types::{ChatChunk, ChatMessage, ChatRequest, ModelCatalogEntry, ModelDetails, ModelList};
