//! Forwarding of local `/api/commerce/*` calls to the commerce backend.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::{header, Method};
use serde_json::Value;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::ProxyError;
use crate::transform::MediaResolver;

/// Status and parsed JSON body returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Upstream {
    pub status: StatusCode,
    pub body: Value,
}

impl Upstream {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Rewrites the body of a successful response. Error responses are
    /// returned untouched.
    pub fn map_success<F>(self, rewrite: F) -> Result<Self, ProxyError>
    where
        F: FnOnce(Value) -> Result<Value, serde_json::Error>,
    {
        if !self.is_success() {
            return Ok(self);
        }
        Ok(Self {
            status: self.status,
            body: rewrite(self.body)?,
        })
    }
}

impl IntoResponse for Upstream {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Clone)]
pub struct BackendProxy {
    http: reqwest::Client,
    backend: BackendConfig,
    media: MediaResolver,
}

impl BackendProxy {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            media: MediaResolver::new(backend.media_origin()),
            backend,
        }
    }

    pub fn media(&self) -> &MediaResolver {
        &self.media
    }

    /// Sends one request to `{api_base}/{segments..}`, passing the caller's
    /// `Authorization` header through verbatim.
    pub async fn forward(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(String, String)],
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> Result<Upstream, ProxyError> {
        let url = self
            .backend
            .resource_url(segments)
            .ok_or_else(|| ProxyError::Path(segments.join("/")))?;
        debug!(%method, %url, "forwarding to commerce backend");

        let mut request = self.http.request(method, url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(authorization) = authorization {
            request = request.header(header::AUTHORIZATION, authorization);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        debug!(status = status.as_u16(), %url, "commerce backend responded");
        Ok(Upstream { status, body })
    }
}
