//! Metric names and recording helpers

use std::time::Instant;

use opentelemetry::metrics::Histogram;

/// Meter name shared by every kiln instrument
pub const METER_NAME: &str = "kiln";

/// Chat requests issued, labelled by mode and outcome
pub const OLLAMA_REQUEST_COUNT: &str = "ollama.request.count";
/// Wall time of a whole chat call, in seconds
pub const OLLAMA_REQUEST_DURATION: &str = "ollama.request.duration";
/// Time from sending a streaming request to its first fragment, in seconds
pub const OLLAMA_TIME_TO_FIRST_FRAGMENT: &str = "ollama.time_to_first_fragment";
/// Fragments delivered to sinks
pub const OLLAMA_STREAM_FRAGMENTS: &str = "ollama.stream.fragments";
/// Wall time of a catalog query, in seconds
pub const OLLAMA_CATALOG_DURATION: &str = "ollama.catalog.duration";

/// Record the time elapsed since `start` on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}
