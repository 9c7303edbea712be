//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

/// Logs request method, route, status, and duration.
///
/// Public share paths carry the bearer token of the link, so they are
/// logged by their matched route template rather than the raw path.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<axum::extract::MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| redact_path(request.uri().path()));
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        route = %route,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "HTTP request"
    );

    response
}

/// Strip anything after the public share prefix.
fn redact_path(path: &str) -> String {
    const SHARED_PREFIX: &str = "/api/shared/health/";
    if path.starts_with(SHARED_PREFIX) {
        format!("{SHARED_PREFIX}{{token}}")
    } else {
        path.to_string()
    }
}
