//! Middleware for ACK HTTP.
use axum::{body::Body, http::Request, middleware::Next, response::IntoResponse};
use std::time::Instant;

/// Logs each request with its response status and latency.
pub async fn log_request(request: Request<Body>, next: Next<Body>) -> impl IntoResponse {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64
    );
    response
}
