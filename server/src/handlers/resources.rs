//! Resources the proxy hands back untouched.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use reqwest::Method;

use super::ForwardQuery;
use crate::error::ProxyError;
use crate::middleware::{Credential, JsonBody, OptionalJsonBody, RequiredCredential};
use crate::proxy::{BackendProxy, Upstream};

type Proxy = State<Arc<BackendProxy>>;

// ===== Products =====

pub async fn get_product(State(proxy): Proxy, credential: Credential, Path(id): Path<String>) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "products", id.as_str()], &[], credential.as_deref(), None)
        .await
}

pub async fn create_product(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::POST, &["commerce", "products"], &[], Some(&credential), Some(body))
        .await
}

pub async fn regenerate_product_image(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    Path(id): Path<String>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::POST,
            &["commerce", "products", id.as_str(), "regenerate-image"],
            &[],
            Some(&credential),
            None,
        )
        .await
}

// ===== Offers =====

pub async fn create_offer(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::POST, &["commerce", "offers"], &[], Some(&credential), Some(body))
        .await
}

pub async fn my_offers(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "offers", "mine"], &query.pairs(), Some(&credential), None)
        .await
}

pub async fn store_offers(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    Path(store_id): Path<String>,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::GET,
            &["commerce", "offers", "store", store_id.as_str()],
            &query.pairs(),
            Some(&credential),
            None,
        )
        .await
}

pub async fn get_offer(State(proxy): Proxy, credential: Credential, Path(id): Path<String>) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "offers", id.as_str()], &[], credential.as_deref(), None)
        .await
}

/// The response message body is optional.
pub async fn accept_offer(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    Path(id): Path<String>,
    OptionalJsonBody(body): OptionalJsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::POST,
            &["commerce", "offers", id.as_str(), "accept"],
            &[],
            Some(&credential),
            body,
        )
        .await
}

pub async fn reject_offer(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    Path(id): Path<String>,
    OptionalJsonBody(body): OptionalJsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::POST,
            &["commerce", "offers", id.as_str(), "reject"],
            &[],
            Some(&credential),
            body,
        )
        .await
}

// ===== Orders =====

pub async fn purchase_direct(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::POST, &["commerce", "orders", "direct"], &[], Some(&credential), Some(body))
        .await
}

pub async fn purchase_from_offer(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::POST, &["commerce", "orders", "from-offer"], &[], Some(&credential), Some(body))
        .await
}

pub async fn my_orders(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "orders", "mine"], &query.pairs(), Some(&credential), None)
        .await
}

pub async fn get_order(State(proxy): Proxy, credential: Credential, Path(id): Path<String>) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "orders", id.as_str()], &[], credential.as_deref(), None)
        .await
}

// ===== Reviews =====

pub async fn create_review(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::POST, &["commerce", "reviews"], &[], Some(&credential), Some(body))
        .await
}

pub async fn order_review(
    State(proxy): Proxy,
    credential: Credential,
    Path(order_id): Path<String>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::GET,
            &["commerce", "reviews", "order", order_id.as_str()],
            &[],
            credential.as_deref(),
            None,
        )
        .await
}

pub async fn listing_reviews(
    State(proxy): Proxy,
    credential: Credential,
    Path(listing_id): Path<String>,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::GET,
            &["commerce", "reviews", "listing", listing_id.as_str()],
            &query.pairs(),
            credential.as_deref(),
            None,
        )
        .await
}

// ===== Trust =====

pub async fn store_trust(
    State(proxy): Proxy,
    credential: Credential,
    Path(store_id): Path<String>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::GET,
            &["commerce", "trust", "store", store_id.as_str()],
            &[],
            credential.as_deref(),
            None,
        )
        .await
}

pub async fn store_trust_events(
    State(proxy): Proxy,
    credential: Credential,
    Path(store_id): Path<String>,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(
            Method::GET,
            &["commerce", "trust", "store", store_id.as_str(), "events"],
            &query.pairs(),
            credential.as_deref(),
            None,
        )
        .await
}

// ===== Activity, leaderboard, looking-for =====

pub async fn activity(
    State(proxy): Proxy,
    credential: Credential,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "activity"], &query.pairs(), credential.as_deref(), None)
        .await
}

pub async fn leaderboard(
    State(proxy): Proxy,
    credential: Credential,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "leaderboard"], &query.pairs(), credential.as_deref(), None)
        .await
}

pub async fn looking_for(
    State(proxy): Proxy,
    credential: Credential,
    Query(query): Query<ForwardQuery>,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::GET, &["commerce", "looking-for"], &query.pairs(), credential.as_deref(), None)
        .await
}

pub async fn create_looking_for(
    State(proxy): Proxy,
    RequiredCredential(credential): RequiredCredential,
    JsonBody(body): JsonBody,
) -> Result<Upstream, ProxyError> {
    proxy
        .forward(Method::POST, &["commerce", "looking-for"], &[], Some(&credential), Some(body))
        .await
}
