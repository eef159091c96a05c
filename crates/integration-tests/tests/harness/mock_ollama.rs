//! Mock Ollama server for integration tests
//!
//! Serves `/api/tags` and `/api/chat` with canned or echoed replies, and can
//! hold a streamed body open to exercise early termination and cancellation.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// What the streamed body does once its lines are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamTail {
    /// Close the connection after the done line
    #[default]
    Close,
    /// Keep the connection open after the done line
    HangAfterDone,
    /// Keep the connection open after the first fragment, never sending done
    HangAfterFirst,
}

/// Builder for a [`MockOllama`]
#[derive(Debug, Default)]
pub struct MockOllamaBuilder {
    models: Vec<serde_json::Value>,
    fragments: Vec<String>,
    echo: bool,
    tail: StreamTail,
    chunk_delay: Option<Duration>,
    tags_status: Option<StatusCode>,
    chat_error: Option<(StatusCode, String)>,
}

impl MockOllamaBuilder {
    /// Add a catalog entry
    pub fn model(mut self, name: &str, modified_at: &str) -> Self {
        self.models.push(serde_json::json!({
            "name": name,
            "modified_at": modified_at,
            "size": 4_661_224_676_u64,
            "digest": format!("sha256:{name}"),
            "details": {
                "format": "gguf",
                "family": "llama",
                "families": ["llama"],
                "parameter_size": "8.0B",
                "quantization_level": "Q4_0"
            }
        }));
        self
    }

    /// Reply with these fragments
    pub fn fragments(mut self, fragments: &[&str]) -> Self {
        self.fragments = fragments.iter().map(|f| (*f).to_owned()).collect();
        self
    }

    /// Reply with the prompt itself, one word per fragment
    pub fn echo(mut self) -> Self {
        self.echo = true;
        self
    }

    /// Choose what happens after the streamed lines
    pub fn tail(mut self, tail: StreamTail) -> Self {
        self.tail = tail;
        self
    }

    /// Pause before each streamed line
    pub fn chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    /// Answer `/api/tags` with this status and an error body
    pub fn tags_status(mut self, status: StatusCode) -> Self {
        self.tags_status = Some(status);
        self
    }

    /// Answer `/api/chat` with this status and body
    pub fn chat_error(mut self, status: StatusCode, body: &str) -> Self {
        self.chat_error = Some((status, body.to_owned()));
        self
    }

    /// Start the mock server, returning once it is listening
    pub async fn start(self) -> anyhow::Result<MockOllama> {
        let state = Arc::new(MockState {
            config: self,
            tags_count: AtomicU32::new(0),
            chat_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/tags", routing::get(handle_tags))
            .route("/api/chat", routing::post(handle_chat))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(MockOllama { addr, shutdown, state })
    }
}

/// A running mock Ollama server
pub struct MockOllama {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    config: MockOllamaBuilder,
    tags_count: AtomicU32,
    chat_count: AtomicU32,
    requests: Mutex<Vec<serde_json::Value>>,
}

impl MockOllama {
    pub fn builder() -> MockOllamaBuilder {
        MockOllamaBuilder::default()
    }

    /// Base URL to point a client at
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of catalog requests received
    pub fn tags_count(&self) -> u32 {
        self.state.tags_count.load(Ordering::Relaxed)
    }

    /// Number of chat requests received
    pub fn chat_count(&self) -> u32 {
        self.state.chat_count.load(Ordering::Relaxed)
    }

    /// Chat request bodies received so far, in arrival order
    pub fn chat_requests(&self) -> Vec<serde_json::Value> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockOllama {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Handlers --

async fn handle_tags(State(state): State<Arc<MockState>>) -> Response {
    state.tags_count.fetch_add(1, Ordering::Relaxed);

    if let Some(status) = state.config.tags_status {
        return (status, "catalog unavailable").into_response();
    }

    Json(serde_json::json!({ "models": state.config.models })).into_response()
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

async fn handle_chat(State(state): State<Arc<MockState>>, Json(raw): Json<serde_json::Value>) -> Response {
    state.chat_count.fetch_add(1, Ordering::Relaxed);
    state.requests.lock().unwrap().push(raw.clone());

    if let Some((status, body)) = &state.config.chat_error {
        return (*status, body.clone()).into_response();
    }

    let Ok(req) = serde_json::from_value::<ChatRequest>(raw) else {
        return (StatusCode::BAD_REQUEST, r#"{"error":"invalid request"}"#).into_response();
    };

    let fragments = if state.config.echo {
        let prompt = req.messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        prompt.split_inclusive(' ').map(str::to_owned).collect()
    } else {
        state.config.fragments.clone()
    };

    if req.stream {
        return streaming_response(&state.config, &req.model, &fragments);
    }

    Json(serde_json::json!({
        "model": req.model,
        "created_at": "2024-07-23T10:00:00Z",
        "message": { "role": "assistant", "content": fragments.concat() },
        "done_reason": "stop",
        "done": true,
        "eval_count": fragments.len()
    }))
    .into_response()
}

fn streaming_response(config: &MockOllamaBuilder, model: &str, fragments: &[String]) -> Response {
    let mut lines: Vec<String> = fragments
        .iter()
        .map(|fragment| {
            serde_json::json!({
                "model": model,
                "message": { "role": "assistant", "content": fragment },
                "done": false
            })
            .to_string()
                + "\n"
        })
        .collect();

    match config.tail {
        StreamTail::HangAfterFirst => lines.truncate(1),
        StreamTail::Close | StreamTail::HangAfterDone => {
            lines.push(
                serde_json::json!({
                    "model": model,
                    "message": { "role": "assistant", "content": "" },
                    "done_reason": "stop",
                    "done": true
                })
                .to_string()
                    + "\n",
            );
        }
    }

    let delay = config.chunk_delay;
    let body: BoxStream<'static, Result<Bytes, Infallible>> = stream::iter(lines)
        .then(move |line| async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Ok(Bytes::from(line))
        })
        .boxed();

    let body = if config.tail == StreamTail::Close {
        body
    } else {
        body.chain(stream::pending()).boxed()
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(body))
        .unwrap()
}
