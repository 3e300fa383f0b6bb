use {
    axum::http::Request,
    tracing::{Span, info_span},
};

/// Span for one incoming HTTP request. Used with
/// `tower_http::trace::TraceLayer::make_span_with`.
pub fn make_span<B>(request: &Request<B>) -> Span {
    let uri = request.uri();
    let method = request.method();

    info_span!("incoming request", %uri, %method)
}
