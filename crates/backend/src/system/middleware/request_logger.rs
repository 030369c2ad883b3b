use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use crate::shared::format::format_number;

/// Request logging middleware
///
/// Prints time (UTC), duration, response size, status, method and path.
/// Streaming responses (SSE, file downloads) are passed through without
/// buffering, their size is logged as "stream".
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let is_stream = response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("text/event-stream") || ct.starts_with("application/octet-stream"))
        .unwrap_or(false);

    if is_stream {
        log_line(response.status().as_u16(), start, "stream", &method, &path);
        return response;
    }

    let (parts, body) = response.into_parts();

    // Buffer the body to report its real size
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(_) => {
            log_line(parts.status.as_u16(), start, "error", &method, &path);
            return Response::from_parts(parts, Body::default());
        }
    };

    log_line(
        parts.status.as_u16(),
        start,
        &format_number(bytes.len()),
        &method,
        &path,
    );

    Response::from_parts(parts, Body::from(bytes))
}

fn log_line(
    status: u16,
    start: std::time::Instant,
    size: &str,
    method: &axum::http::Method,
    path: &str,
) {
    let duration = start.elapsed();
    // Cyan for 2xx, yellow otherwise
    let color_code = if (200..300).contains(&status) { "36" } else { "33" };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color_code,
        Utc::now().format("%H:%M:%S"),
        duration.as_millis(),
        size,
        status,
        method,
        path
    );
    tracing::debug!(status, %method, path, elapsed_ms = duration.as_millis() as u64, "request");
}
