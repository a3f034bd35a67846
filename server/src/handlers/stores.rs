use std::sync::Arc;

use axum::extract::{Path, Query, State};
use reqwest::Method;
use serde_json::Value;

use super::ForwardQuery;
use crate::error::ProxyError;
use crate::middleware::{Credential, JsonBody, RequiredCredential};
use crate::models::{Page, WireStore};
use crate::proxy::{BackendProxy, Upstream};
use crate::transform::{transform_store_envelope, transform_stores_page};

fn stores_page(body: Value) -> Result<Value, serde_json::Error> {
    let page: Page<WireStore, Value> = serde_json::from_value(body)?;
    serde_json::to_value(transform_stores_page(page))
}

fn store_envelope(body: Value) -> Result<Value, serde_json::Error> {
    serde_json::to_value(transform_store_envelope(body)?)
}

pub async fn list_stores(
    State(proxy): State<Arc<BackendProxy>>,
    credential: Credential,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "stores"], &query.pairs(), credential.as_deref(), None)
        .await?
        .map_success(stores_page)
}

pub async fn get_store(
    State(proxy): State<Arc<BackendProxy>>,
    credential: Credential,
    Path(id): Path<String>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "stores", id.as_str()], &[], credential.as_deref(), None)
        .await?
        .map_success(store_envelope)
}

pub async fn create_store(
    State(proxy): State<Arc<BackendProxy>>,
    RequiredCredential(credential): RequiredCredential,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::POST, &["commerce", "stores"], &[], Some(&credential), Some(body))
        .await?
        .map_success(store_envelope)
}

pub async fn update_store_policies(
    State(proxy): State<Arc<BackendProxy>>,
    RequiredCredential(credential): RequiredCredential,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::PATCH,
            &["commerce", "stores", id.as_str(), "policies"],
            &[],
            Some(&credential),
            Some(body),
        )
        .await?
        .map_success(store_envelope)
}
