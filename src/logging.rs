use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

// The archive upload runs without a timeout, so slow requests are the thing
// worth flagging.
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(10);

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed = started_at.elapsed();

    info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = elapsed.as_millis(),
        "request summary"
    );

    if elapsed > SLOW_REQUEST_THRESHOLD {
        warn!(
            method = %method,
            path = %path,
            duration_ms = elapsed.as_millis(),
            "slow request"
        );
    }

    response
}
