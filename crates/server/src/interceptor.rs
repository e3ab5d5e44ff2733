//! Diagnostic layers: the global request logger and the timing interceptor of
//! the cats handler group. Neither touches the request or response.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

/// Global middleware: one log line per incoming request.
pub async fn logger(req: Request, next: Next) -> Response {
    info!(method = %req.method(), uri = %req.uri(), "Request...");
    next.run(req).await
}

/// Handler name as `METHOD /matched/path`, falling back to the raw path.
fn handler_name(req: &Request) -> String {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    format!("{} {}", req.method(), path)
}

/// Route-level interceptor: logs before and after the handler with the
/// elapsed time, and feeds the request metrics.
pub async fn logging_interceptor(req: Request, next: Next) -> Response {
    let handler = handler_name(&req);
    info!(%handler, "Before...");

    let started = Instant::now();
    let response = next.run(req).await;
    let elapsed = started.elapsed();

    let status = response.status().as_u16();
    info!(%handler, status, elapsed_ms = elapsed.as_millis() as u64, "After...");
    common::metrics::observe_request(&handler, status, elapsed.as_secs_f64());
    response
}
