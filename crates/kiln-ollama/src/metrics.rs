use kiln_telemetry::metrics::{
    METER_NAME, OLLAMA_CATALOG_DURATION, OLLAMA_REQUEST_COUNT, OLLAMA_REQUEST_DURATION, OLLAMA_STREAM_FRAGMENTS,
    OLLAMA_TIME_TO_FIRST_FRAGMENT,
};
use kiln_telemetry::{Counter, Histogram};
use opentelemetry::global;
use opentelemetry::metrics::Meter;

/// Instruments recorded by the client
///
/// Created against the global meter, so they are no-ops until a meter
/// provider is installed.
#[derive(Clone)]
pub(crate) struct ClientMetrics {
    pub requests: Counter<u64>,
    pub request_duration: Histogram<f64>,
    pub time_to_first_fragment: Histogram<f64>,
    pub fragments: Counter<u64>,
    pub catalog_duration: Histogram<f64>,
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self::from_meter(&global::meter(METER_NAME))
    }

    pub fn from_meter(meter: &Meter) -> Self {
        Self {
            requests: meter
                .u64_counter(OLLAMA_REQUEST_COUNT)
                .with_description("Chat requests issued")
                .build(),
            request_duration: meter
                .f64_histogram(OLLAMA_REQUEST_DURATION)
                .with_description("Wall time of a chat call")
                .with_unit("s")
                .build(),
            time_to_first_fragment: meter
                .f64_histogram(OLLAMA_TIME_TO_FIRST_FRAGMENT)
                .with_description("Time until the first streamed fragment")
                .with_unit("s")
                .build(),
            fragments: meter
                .u64_counter(OLLAMA_STREAM_FRAGMENTS)
                .with_description("Fragments delivered to sinks")
                .build(),
            catalog_duration: meter
                .f64_histogram(OLLAMA_CATALOG_DURATION)
                .with_description("Wall time of a catalog query")
                .with_unit("s")
                .build(),
        }
    }
}
