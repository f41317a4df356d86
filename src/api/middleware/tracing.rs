//! HTTP access logging.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Request span at `INFO` (method, URI, version), one `INFO` line per response
/// with status and latency in milliseconds, and an `ERROR` line for 5xx.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST uri=/api/rotation/run version=HTTP/1.1}: finished processing request latency=412 ms status=200
/// ```
///
/// Query strings are part of the URI, so `/redirect?target=...` shows the
/// affiliate target in access logs.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
