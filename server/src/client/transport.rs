use async_trait::async_trait;
use reqwest::{header, Method, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::CommerceError;

/// One call against the local proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Appends a query parameter; `None` values are left out.
    pub fn query<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends requests and returns parsed JSON, or a `CommerceError` carrying a
/// display message. No retries and no client-side timeout.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, CommerceError>;
}

/// `reqwest` transport that attaches the bearer credential when present.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    origin: Url,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            origin: config.origin,
            api_key: config.api_key,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, CommerceError> {
        let mut url = self
            .origin
            .join(&request.path)
            .map_err(|e| CommerceError::Url(e.to_string()))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        debug!(method = %request.method, %url, "commerce request");

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text);
            warn!(status = status.as_u16(), path = %request.path, %message, "commerce request rejected");
            return Err(CommerceError::Api(message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => parsed
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or("Request failed")
            .to_string(),
        Err(_) => "Unknown error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn echo_auth(headers: HeaderMap) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({ "authorization": auth }))
    }

    #[tokio::test]
    async fn attaches_bearer_only_when_configured() {
        let app = Router::new().route("/api/commerce/echo", get(|h: HeaderMap| async move { echo_auth(h) }));
        let origin = serve(app).await;

        let keyed = HttpTransport::new(ClientConfig::new(&origin, Some("key_123".to_string())).unwrap());
        let body = keyed.send(ApiRequest::get("/api/commerce/echo")).await.unwrap();
        assert_eq!(body["authorization"], "Bearer key_123");

        let anonymous = HttpTransport::new(ClientConfig::new(&origin, None).unwrap());
        let body = anonymous.send(ApiRequest::get("/api/commerce/echo")).await.unwrap();
        assert!(body["authorization"].is_null());
    }

    #[tokio::test]
    async fn serializes_query_and_skips_missing_values() {
        let app = Router::new().route(
            "/api/commerce/q",
            get(|axum::extract::RawQuery(q): axum::extract::RawQuery| async move {
                Json(json!({ "query": q }))
            }),
        );
        let origin = serve(app).await;
        let transport = HttpTransport::new(ClientConfig::new(&origin, None).unwrap());

        let request = ApiRequest::get("/api/commerce/q")
            .query("limit", Some(25))
            .query("status", None::<&str>)
            .query("offset", Some(50));
        let body = transport.send(request).await.unwrap();
        assert_eq!(body["query"], "limit=25&offset=50");
    }

    #[tokio::test]
    async fn normalizes_error_bodies() {
        let app = Router::new()
            .route(
                "/with-message",
                get(|| async { (StatusCode::CONFLICT, Json(json!({"error": "Offer already accepted"}))) }),
            )
            .route(
                "/without-message",
                get(|| async { (StatusCode::BAD_REQUEST, Json(json!({"detail": "nope"}))) }),
            )
            .route("/not-json", get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }));
        let origin = serve(app).await;
        let transport = HttpTransport::new(ClientConfig::new(&origin, None).unwrap());

        let err = transport.send(ApiRequest::get("/with-message")).await.unwrap_err();
        assert_eq!(err, CommerceError::Api("Offer already accepted".to_string()));

        let err = transport.send(ApiRequest::get("/without-message")).await.unwrap_err();
        assert_eq!(err, CommerceError::Api("Request failed".to_string()));

        let err = transport.send(ApiRequest::get("/not-json")).await.unwrap_err();
        assert_eq!(err, CommerceError::Api("Unknown error".to_string()));
    }
}
