use std::fmt;

use serde::{Deserialize, Serialize};

/// Sampling and generation parameters
///
/// Every parameter is optional and an unset parameter is never sent, so
/// the server applies its own default. `Some(0.0)` is an explicit value,
/// distinct from `None`. An empty `stop` list is treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Sample only from the `k` most likely tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    /// Random seed for reproducible output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Maximum tokens to generate (`-1` for unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,
    /// Context window size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_ctx: Option<i32>,
    /// Penalty applied to repeated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_penalty: Option<f64>,
    /// How far back to look when penalizing repetition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_last_n: Option<i32>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    /// Tail-free sampling parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfs_z: Option<f64>,
    /// Locally typical sampling parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_p: Option<f64>,
    /// Presence penalty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Frequency penalty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
}

impl SamplingOptions {
    /// Whether no parameter is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Receives each generated text fragment as it arrives
///
/// Runs inline on the task reading the response; a slow sink slows the
/// read and a sink that never returns stalls the call.
pub type FragmentSink<'a> = Box<dyn FnMut(&str) + Send + 'a>;

/// Everything the caller controls about one chat call
#[derive(Default)]
pub struct GenerationConfig<'a> {
    /// Model name; empty or [`AUTO_MODEL`](crate::AUTO_MODEL) selects automatically
    pub model: String,
    /// Request a streamed response
    pub stream: bool,
    /// Sampling parameters
    pub options: SamplingOptions,
    /// Incremental text sink, only invoked for streamed responses
    pub on_fragment: Option<FragmentSink<'a>>,
}

impl<'a> GenerationConfig<'a> {
    /// Non-streaming config for `model` with no sampling parameters
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Enable or disable streaming
    #[must_use]
    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Replace the sampling parameters
    #[must_use]
    pub fn with_options(mut self, options: SamplingOptions) -> Self {
        self.options = options;
        self
    }

    /// Install a fragment sink
    #[must_use]
    pub fn on_fragment(mut self, sink: impl FnMut(&str) + Send + 'a) -> Self {
        self.on_fragment = Some(Box::new(sink));
        self
    }
}

impl fmt::Debug for GenerationConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("stream", &self.stream)
            .field("options", &self.options)
            .field("on_fragment", &self.on_fragment.as_ref().map(|_| ".."))
            .finish()
    }
}
