//! Bearer credential extraction. The header value is never inspected; it is
//! forwarded to the backend exactly as received.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;

use crate::error::ProxyError;

fn authorization(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

/// `Authorization` header if the caller sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(pub Option<String>);

impl Credential {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Credential(authorization(parts)))
    }
}

/// Rejects the request with 401 before anything is sent upstream when the
/// header is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredCredential(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RequiredCredential
where
    S: Send + Sync,
{
    type Rejection = ProxyError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorization(parts)
            .map(RequiredCredential)
            .ok_or(ProxyError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/commerce/offers/mine");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn optional_credential_passes_value_through() {
        let mut with = parts(Some("Bearer key_1"));
        let credential = Credential::from_request_parts(&mut with, &()).await.unwrap();
        assert_eq!(credential.as_deref(), Some("Bearer key_1"));

        let mut without = parts(None);
        let credential = Credential::from_request_parts(&mut without, &()).await.unwrap();
        assert_eq!(credential, Credential(None));
    }

    #[tokio::test]
    async fn required_credential_rejects_blank_header() {
        let mut blank = parts(Some("  "));
        let rejection = RequiredCredential::from_request_parts(&mut blank, &()).await.unwrap_err();
        assert!(matches!(rejection, ProxyError::Unauthorized));
    }
}
