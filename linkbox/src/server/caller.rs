// src/server/caller.rs
use crate::domain::caller::CallerId;
use crate::infrastructure::http::CALLER_HEADER;
use crate::server::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

/// Authenticated caller taken from the `X-User-Id` header.
///
/// The header is set by the authenticating proxy in front of the server.
/// A missing or malformed value rejects the request with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub CallerId);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(ApiError::unauthorized)?;
        let caller = value
            .to_str()
            .ok()
            .and_then(|raw| raw.parse::<CallerId>().ok())
            .ok_or_else(|| {
                debug!("Rejecting malformed caller header: {:?}", value);
                ApiError::unauthorized()
            })?;
        Ok(Caller(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(header: Option<&str>) -> Result<Caller, ApiError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(CALLER_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn given_positive_id_when_extract_then_caller() {
        let caller = extract(Some(" 17 ")).await.unwrap();
        assert_eq!(caller.0.value(), 17);
    }

    #[tokio::test]
    async fn given_missing_or_bad_header_when_extract_then_401() {
        for header in [None, Some(""), Some("abc"), Some("0"), Some("-3")] {
            let err = extract(header).await.unwrap_err();
            assert_eq!(err.status, StatusCode::UNAUTHORIZED, "header {:?}", header);
            assert_eq!(err.message, "authentication required");
        }
    }
}
