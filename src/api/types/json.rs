//! JSON body extractors

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;

/// JSON body that is `None` when missing or unparsable
///
/// Handlers decide what an absent body means instead of rejecting the request
/// up front. Content-Type is not checked.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub Option<T>);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            ApiError::bad_request(
                "invalid_body",
                format!("Failed to read request body: {}", rejection.body_text()),
            )
        })?;

        Ok(Self(parse_body(&body)))
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Option<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "Ignoring unparsable request body");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    #[test]
    fn test_parse_valid_body() {
        let parsed: Option<Payload> = parse_body(br#"{"name": "x"}"#);
        assert_eq!(parsed, Some(Payload { name: "x".to_string() }));
    }

    #[test]
    fn test_empty_body_is_none() {
        assert_eq!(parse_body::<Payload>(b""), None);
        assert_eq!(parse_body::<Payload>(b"  \n"), None);
    }

    #[test]
    fn test_malformed_body_is_none() {
        assert_eq!(parse_body::<Payload>(b"{not json"), None);
        assert_eq!(parse_body::<Payload>(br#"{"other": 1}"#), None);
    }
}
