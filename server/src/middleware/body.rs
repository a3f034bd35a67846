//! JSON request bodies. The body is parsed whatever the `Content-Type`
//! says; anything unreadable is a local failure answered with the generic
//! 500 body rather than axum's plain-text rejection.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use crate::error::ProxyError;

async fn read_bytes<S>(req: Request, state: &S) -> Result<Bytes, ProxyError>
where
    S: Send + Sync,
{
    Bytes::from_request(req, state)
        .await
        .map_err(|rejection| ProxyError::Body(rejection.body_text()))
}

fn parse(bytes: &[u8]) -> Result<Value, ProxyError> {
    serde_json::from_slice(bytes).map_err(|err| ProxyError::Body(err.to_string()))
}

/// A required JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ProxyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = read_bytes(req, state).await?;
        parse(&bytes).map(JsonBody)
    }
}

/// A JSON body the caller may leave empty.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalJsonBody(pub Option<Value>);

#[async_trait]
impl<S> FromRequest<S> for OptionalJsonBody
where
    S: Send + Sync,
{
    type Rejection = ProxyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = read_bytes(req, state).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJsonBody(None));
        }
        parse(&bytes).map(|value| OptionalJsonBody(Some(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http};
    use serde_json::json;

    fn request(body: &'static str) -> Request {
        http::Request::builder()
            .method("POST")
            .uri("/api/commerce/reviews")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn parses_without_content_type() {
        let JsonBody(value) = JsonBody::from_request(request(r#"{"rating":5}"#), &()).await.unwrap();
        assert_eq!(value, json!({ "rating": 5 }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_proxy_error() {
        let err = JsonBody::from_request(request("{not json"), &()).await.unwrap_err();
        assert!(matches!(err, ProxyError::Body(_)));

        let err = JsonBody::from_request(request(""), &()).await.unwrap_err();
        assert!(matches!(err, ProxyError::Body(_)));
    }

    #[tokio::test]
    async fn optional_body_may_be_empty() {
        let OptionalJsonBody(value) = OptionalJsonBody::from_request(request(""), &()).await.unwrap();
        assert_eq!(value, None);

        let err = OptionalJsonBody::from_request(request("{"), &()).await.unwrap_err();
        assert!(matches!(err, ProxyError::Body(_)));
    }
}
