//! Error types for the storefront client and the local proxy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// The single error surfaced by the commerce client, the resource cache
/// and the state containers. Every variant carries a display message;
/// callers never see HTTP status codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommerceError {
    /// The backend (or the proxy in front of it) rejected the request.
    #[error("{0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("could not encode request: {0}")]
    Encode(String),
    #[error("cache entry for {0} holds a different type")]
    Cache(String),
}

impl CommerceError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for CommerceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CommerceError::Decode(err.to_string())
        } else {
            CommerceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(err: serde_json::Error) -> Self {
        CommerceError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CommerceError {
    fn from(err: validator::ValidationErrors) -> Self {
        CommerceError::Validation(err.to_string())
    }
}

/// JSON error body shared by the proxy and the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Failures raised while proxying a request to the commerce backend.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("missing authorization header")]
    Unauthorized,
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("upstream returned malformed json: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unreadable request body: {0}")]
    Body(String),
    #[error("path segment {0:?} cannot be forwarded")]
    Path(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, Json(ErrorBody::new("Unauthorized"))).into_response()
            }
            ProxyError::Path(segment) => {
                tracing::warn!(%segment, "refusing to forward path");
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new("Invalid path"))).into_response()
            }
            other => {
                tracing::error!(error = %other, "proxy request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_backend_message_verbatim() {
        let err = CommerceError::Api("Listing is sold out".to_string());
        assert_eq!(err.message(), "Listing is sold out");
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response = ProxyError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unreadable_body_maps_to_500() {
        let response = ProxyError::Body("expected value".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_upstream_maps_to_500() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let response = ProxyError::from(parse).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
