//! Keyed request deduplication and response caching for read endpoints.
//!
//! A request for a key that is already pending attaches to the pending
//! future instead of issuing a second call. Resolved values are kept per key
//! and served until they are older than the configured `max_age`.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::client::{CommerceClient, ListingQuery, OfferQuery, OrderQuery, PageParams};
use crate::error::CommerceError;
use crate::models::{
    ActivityEvent, LeaderboardEntry, Listing, Offer, Order, Page, Review, Store, TrustEvent,
    TrustProfile,
};

type Erased = Arc<dyn Any + Send + Sync>;
type InFlight = Shared<BoxFuture<'static, Result<Erased, CommerceError>>>;

/// Entity tag plus its parameters, e.g. `listing-reviews/lst_1/{"limit":25,...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(tag: &str) -> Self {
        Self(tag.to_string())
    }

    pub fn id(mut self, id: &str) -> Self {
        self.0.push('/');
        self.0.push_str(id);
        self
    }

    /// Appends the JSON form of `params`. Fails when they do not serialize,
    /// so two unrelated parameter sets never share a key.
    pub fn params<P: Serialize>(mut self, params: &P) -> Result<Self, CommerceError> {
        let encoded = serde_json::to_string(params).map_err(|err| CommerceError::Encode(err.to_string()))?;
        self.0.push('/');
        self.0.push_str(&encoded);
        Ok(self)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// When a cached value counts as fresh. `max_age: None` keeps values until
/// they are invalidated or explicitly revalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age: Option<Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age: Some(Duration::from_secs(2)),
        }
    }
}

/// What a read hook reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl<T> Resource<T> {
    /// No key: nothing fetched, nothing loading.
    pub fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
        }
    }

    fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_loading: false,
        }
    }
}

struct Entry {
    value: Erased,
    fetched_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, Entry>,
    errors: HashMap<CacheKey, String>,
    in_flight: HashMap<CacheKey, InFlight>,
}

#[derive(Clone)]
pub struct ResourceCache {
    state: Arc<Mutex<CacheState>>,
    policy: CachePolicy,
}

impl ResourceCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            policy,
        }
    }

    /// Serves a fresh cached value, joins a pending request, or starts one.
    pub async fn fetch<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Resource<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CommerceError>> + Send + 'static,
    {
        self.load(key, fetcher, false).await
    }

    /// Like [`fetch`](Self::fetch) but ignores any cached value. A pending
    /// request for the key is still shared.
    pub async fn revalidate<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Resource<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CommerceError>> + Send + 'static,
    {
        self.load(key, fetcher, true).await
    }

    async fn load<T, F, Fut>(&self, key: CacheKey, fetcher: F, force: bool) -> Resource<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CommerceError>> + Send + 'static,
    {
        let pending = {
            let mut state = self.state.lock().await;

            if !force {
                if let Some(entry) = state.entries.get(&key) {
                    if self.is_fresh(entry) {
                        debug!(%key, "cache hit");
                        return match downcast::<T>(entry.value.clone(), &key) {
                            Ok(value) => Resource::ready(value),
                            Err(err) => failed(None, err),
                        };
                    }
                }
            }

            match state.in_flight.get(&key) {
                Some(pending) => {
                    debug!(%key, "joining in-flight request");
                    pending.clone()
                }
                None => {
                    let pending = fetcher()
                        .map(|result| result.map(|value| Arc::new(value) as Erased))
                        .boxed()
                        .shared();
                    state.in_flight.insert(key.clone(), pending.clone());
                    pending
                }
            }
        };

        let outcome = pending.clone().await;

        let mut state = self.state.lock().await;
        let owns_slot = state
            .in_flight
            .get(&key)
            .map_or(false, |current| current.ptr_eq(&pending));
        if owns_slot {
            state.in_flight.remove(&key);
            match &outcome {
                Ok(value) => {
                    state.entries.insert(
                        key.clone(),
                        Entry {
                            value: value.clone(),
                            fetched_at: Instant::now(),
                        },
                    );
                    state.errors.remove(&key);
                }
                Err(err) => {
                    state.errors.insert(key.clone(), err.message());
                }
            }
        }

        match outcome {
            Ok(value) => match downcast::<T>(value, &key) {
                Ok(value) => Resource::ready(value),
                Err(err) => failed(None, err),
            },
            Err(err) => {
                // keep showing the last good value next to the error
                let stale = state
                    .entries
                    .get(&key)
                    .and_then(|entry| downcast::<T>(entry.value.clone(), &key).ok());
                failed(stale, err)
            }
        }
    }

    /// Current state for `key` without triggering a fetch.
    pub async fn peek<T>(&self, key: Option<&CacheKey>) -> Resource<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let Some(key) = key else {
            return Resource::idle();
        };
        let state = self.state.lock().await;
        Resource {
            data: state
                .entries
                .get(key)
                .and_then(|entry| downcast::<T>(entry.value.clone(), key).ok()),
            error: state.errors.get(key).cloned(),
            is_loading: state.in_flight.contains_key(key),
        }
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        let mut state = self.state.lock().await;
        state.entries.remove(key);
        state.errors.remove(key);
    }

    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.errors.clear();
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        self.policy
            .max_age
            .map_or(true, |max_age| entry.fetched_at.elapsed() < max_age)
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

fn downcast<T: Clone + Send + Sync + 'static>(value: Erased, key: &CacheKey) -> Result<T, CommerceError> {
    value
        .downcast::<T>()
        .map(|value| (*value).clone())
        .map_err(|_| CommerceError::Cache(key.to_string()))
}

fn failed<T>(data: Option<T>, err: CommerceError) -> Resource<T> {
    Resource {
        data,
        error: Some(err.message()),
        is_loading: false,
    }
}

/// Read hooks over the commerce API, one per cached resource. Hooks that
/// take an `Option` id report [`Resource::idle`] without fetching when the
/// id is absent.
#[derive(Clone)]
pub struct CommerceResources {
    client: CommerceClient,
    cache: ResourceCache,
}

impl CommerceResources {
    pub fn new(client: CommerceClient, cache: ResourceCache) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub async fn store(&self, id: Option<&str>) -> Resource<Store> {
        let Some(id) = id.map(str::to_string) else {
            return Resource::idle();
        };
        let client = self.client.clone();
        let key = CacheKey::new("store").id(&id);
        self.cache
            .fetch(key, move || async move { client.get_store(&id).await })
            .await
    }

    pub async fn stores(&self, params: PageParams) -> Resource<Page<Store>> {
        let client = self.client.clone();
        let key = match CacheKey::new("stores").params(&params) {
            Ok(key) => key,
            Err(err) => return failed(None, err),
        };
        self.cache
            .fetch(key, move || async move { client.get_stores(params).await })
            .await
    }

    pub async fn listing(&self, id: Option<&str>) -> Resource<Listing> {
        let Some(id) = id.map(str::to_string) else {
            return Resource::idle();
        };
        let client = self.client.clone();
        let key = CacheKey::new("listing").id(&id);
        self.cache
            .fetch(key, move || async move { client.get_listing(&id).await })
            .await
    }

    pub async fn listings(&self, query: ListingQuery) -> Resource<Page<Listing>> {
        let client = self.client.clone();
        let key = match CacheKey::new("listings").params(&query) {
            Ok(key) => key,
            Err(err) => return failed(None, err),
        };
        self.cache
            .fetch(key, move || async move { client.get_listings(&query).await })
            .await
    }

    pub async fn listing_reviews(&self, listing_id: Option<&str>, params: PageParams) -> Resource<Page<Review>> {
        let Some(listing_id) = listing_id.map(str::to_string) else {
            return Resource::idle();
        };
        let client = self.client.clone();
        let key = match CacheKey::new("listing-reviews").id(&listing_id).params(&params) {
            Ok(key) => key,
            Err(err) => return failed(None, err),
        };
        self.cache
            .fetch(key, move || async move { client.get_listing_reviews(&listing_id, params).await })
            .await
    }

    pub async fn my_offers(&self, query: OfferQuery) -> Resource<Page<Offer>> {
        let client = self.client.clone();
        let key = match CacheKey::new("my-offers").params(&query) {
            Ok(key) => key,
            Err(err) => return failed(None, err),
        };
        self.cache
            .fetch(key, move || async move { client.get_my_offers(&query).await })
            .await
    }

    pub async fn store_offers(&self, store_id: Option<&str>, query: OfferQuery) -> Resource<Page<Offer>> {
        let Some(store_id) = store_id.map(str::to_string) else {
            return Resource::idle();
        };
        let client = self.client.clone();
        let key = match CacheKey::new("store-offers").id(&store_id).params(&query) {
            Ok(key) => key,
            Err(err) => return failed(None, err),
        };
        self.cache
            .fetch(key, move || async move { client.get_store_offers(&store_id, &query).await })
            .await
    }

    pub async fn offer(&self, id: Option<&str>) -> Resource<Offer> {
        let Some(id) = id.map(str::to_string) else {
            return Resource::idle();
        };
        let client = self.client.clone();
        let key = CacheKey::new("offer").id(&id);
        self.cache
            .fetch(key, move || async move { client.get_offer(&id).await })
            .await
    }

    pub async fn order(&self, id: Option<&str>) -> Resource<Order> {
        let Some(id) = id.map(str::to_string) else {
            return Resource::idle();
        };
        let client = self.client.clone();
        let key = CacheKey::new("order").id(&id);
        self.cache
            .fetch(key, move || async move { client.get_order(&id).await })
            .await
    }

    pub async fn my_orders(&self, query: OrderQuery) -> Resource<Page<Order>> {
        let client = self.client.clone();
        let key = match CacheKey::new("my-orders").params(&query) {
            Ok(key) => key,
            Err(err) => return failed(None, err),
        };
        self.cache
            .fetch(key, move || async move { client.get_my_orders(&query).await })
            .await
    }

    /// `data: Some(None)` means the order exists but has no review yet.
    pub async fn order_review(&self, order_id: Option<&str>) -> Resource<Option<Review>> {
        let Some(order_id) = order_id.map(str::to_string) else {
            return Resource::idle();
        };
        let client = self.client.clone();
        let key = CacheKey::new("order-review").id(&order_id);
        self.cache
            .fetch(key, move || async move { client.get_order_review(&order_id).await })
            .await
    }

    pub async fn activity(&self, params: PageParams) -> Resource<Page<ActivityEvent>> {
        let client = self.client.clone();
        let key = match CacheKey::new("activity").params(&params) {
            Ok(key) => key,
            Err(err) => return failed(None, err),
        };
        self.cache
            .fetch(key, move || async move { client.get_activity(params).await })
            .await
    }

    pub async fn leaderboard(&self, limit: Option<u32>) -> Resource<Vec<LeaderboardEntry>> {
        let client = self.client.clone();
        let key = match CacheKey::new("leaderboard").params(&limit) {
            Ok(key) => key,
            Err(err) => return failed(None, err),
        };
        self.cache
            .fetch(key, move || async move { client.get_leaderboard(limit).await })
            .await
    }

    pub async fn store_trust(&self, store_id: Option<&str>) -> Resource<TrustProfile> {
        let Some(store_id) = store_id.map(str::to_string) else {
            return Resource::idle();
        };
        let client = self.client.clone();
        let key = CacheKey::new("store-trust").id(&store_id);
        self.cache
            .fetch(key, move || async move { client.get_store_trust(&store_id).await })
            .await
    }

    pub async fn store_trust_events(&self, store_id: Option<&str>, params: PageParams) -> Resource<Page<TrustEvent>> {
        let Some(store_id) = store_id.map(str::to_string) else {
            return Resource::idle();
        };
        let client = self.client.clone();
        let key = match CacheKey::new("store-trust-events").id(&store_id).params(&params) {
            Ok(key) => key,
            Err(err) => return failed(None, err),
        };
        self.cache
            .fetch(key, move || async move { client.get_store_trust_events(&store_id, params).await })
            .await
    }
}
