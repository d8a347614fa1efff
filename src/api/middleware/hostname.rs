//! Caller hostname extraction

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

const FORWARDED_HOST: &str = "x-forwarded-host";

/// Hostname the request was addressed to, without port
///
/// `X-Forwarded-Host` wins over `Host` so the gateway can sit behind a proxy.
/// Missing headers yield an empty hostname, which only wildcard keys accept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestHostname(pub String);

impl RequestHostname {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequestHostname
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(hostname_from_headers(&parts.headers)))
    }
}

fn hostname_from_headers(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get(FORWARDED_HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let raw = forwarded.or_else(|| {
        headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    });

    raw.map(strip_port).unwrap_or_default().to_string()
}

/// `example.com:8080` -> `example.com`, `[::1]:3001` -> `::1`
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}
