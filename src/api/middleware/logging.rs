//! Request/response logging middleware with key redaction

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::info;

const KEY_ROUTE_PREFIX: &str = "/authorization/";

/// Middleware to log HTTP requests and responses.
/// Does not open its own span; `TraceLayer` already does.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);
    let headers_log = redact_headers(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

/// Matched route template, or the raw path with any presented key masked
fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| mask_key_in_path(request.uri().path()))
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Keep the first four characters of a key segment and mask the rest
fn mask_key_in_path(path: &str) -> String {
    let Some(rest) = path.strip_prefix(KEY_ROUTE_PREFIX) else {
        return path.to_string();
    };

    let (key, tail) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let prefix: String = key.chars().take(4).collect();
    format!("{}{}***{}", KEY_ROUTE_PREFIX, prefix, tail)
}

fn redact_headers(request: &Request<Body>) -> String {
    let mut parts = Vec::new();

    for (name, value) in request.headers() {
        let name_str = name.as_str().to_lowercase();

        if !should_log_header(&name_str) {
            continue;
        }

        let value_str = if is_sensitive_header(&name_str) {
            "[REDACTED]".to_string()
        } else {
            value.to_str().unwrap_or("[invalid]").to_string()
        };

        parts.push(format!("{}={}", name_str, value_str));
    }

    parts.join(", ")
}

fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "x-api-key" | "cookie" | "set-cookie" | "proxy-authorization"
    )
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "host"
            | "x-forwarded-host"
            | "user-agent"
            | "x-request-id"
            | "x-forwarded-for"
            | "authorization"
            | "x-api-key"
    )
}
