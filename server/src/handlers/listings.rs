use std::sync::Arc;

use axum::extract::{Path, Query, State};
use reqwest::Method;
use serde_json::Value;

use super::ForwardQuery;
use crate::error::ProxyError;
use crate::middleware::{Credential, JsonBody, RequiredCredential};
use crate::models::{Page, WireListing};
use crate::proxy::{BackendProxy, Upstream};
use crate::transform::{transform_listing_envelope, transform_listings_page, MediaResolver};

fn listings_page(media: &MediaResolver, body: Value) -> Result<Value, serde_json::Error> {
    let page: Page<WireListing, Value> = serde_json::from_value(body)?;
    serde_json::to_value(transform_listings_page(page, media))
}

fn listing_envelope(media: &MediaResolver, body: Value) -> Result<Value, serde_json::Error> {
    serde_json::to_value(transform_listing_envelope(body, media)?)
}

pub async fn list_listings(
    State(proxy): State<Arc<BackendProxy>>,
    credential: Credential,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "listings"], &query.pairs(), credential.as_deref(), None)
        .await?
        .map_success(|body| listings_page(proxy.media(), body))
}

pub async fn get_listing(
    State(proxy): State<Arc<BackendProxy>>,
    credential: Credential,
    Path(id): Path<String>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "listings", id.as_str()], &[], credential.as_deref(), None)
        .await?
        .map_success(|body| listing_envelope(proxy.media(), body))
}

pub async fn create_listing(
    State(proxy): State<Arc<BackendProxy>>,
    RequiredCredential(credential): RequiredCredential,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::POST, &["commerce", "listings"], &[], Some(&credential), Some(body))
        .await?
        .map_success(|body| listing_envelope(proxy.media(), body))
}

pub async fn update_listing_price(
    State(proxy): State<Arc<BackendProxy>>,
    RequiredCredential(credential): RequiredCredential,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::PATCH,
            &["commerce", "listings", id.as_str(), "price"],
            &[],
            Some(&credential),
            Some(body),
        )
        .await?
        .map_success(|body| listing_envelope(proxy.media(), body))
}

/// Reviews attached to a listing; passed through as-is.
pub async fn get_listing_review_thread(
    State(proxy): State<Arc<BackendProxy>>,
    credential: Credential,
    Path(id): Path<String>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::GET,
            &["commerce", "listings", id.as_str(), "review-thread"],
            &[],
            credential.as_deref(),
            None,
        )
        .await
}
