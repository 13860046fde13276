//! Per-request logging span.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Instrument, info, info_span, warn};

use super::request_id::RequestId;

/// Runs the request inside an `http_request` span and logs arrival and
/// completion. Layer it inside
/// [`request_id_middleware`](super::request_id_middleware) so the id is set.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map_or("-", |id| id.0.as_str())
        .to_owned();
    let span = info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    );

    async move {
        info!("request received");
        let response = next.run(request).await;
        let status = response.status().as_u16();
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if response.status().is_server_error() {
            warn!(status, duration_ms, "response sent");
        } else {
            info!(status, duration_ms, "response sent");
        }
        response
    }
    .instrument(span)
    .await
}
