//! In-memory transport used by the client, cache and state tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use super::transport::{ApiRequest, Transport};
use crate::error::CommerceError;

type Key = (Method, String);

#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: Mutex<HashMap<Key, VecDeque<Result<Value, CommerceError>>>>,
    gates: Mutex<HashMap<Key, Arc<Semaphore>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a response for `method path`. The last queued response for a
    /// route keeps being served once the others are used up.
    pub(crate) fn respond(&self, method: Method, path: &str, response: Result<Value, CommerceError>) {
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Holds every call to `method path` until [`release`](Self::release).
    pub(crate) fn gate(&self, method: Method, path: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .unwrap()
            .insert((method, path.to_string()), gate.clone());
        gate
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.path == path)
            .count()
    }

    pub(crate) fn last_call(&self) -> Option<ApiRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

pub(crate) fn release(gate: &Semaphore) {
    gate.add_permits(1);
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, CommerceError> {
        let key = (request.method.clone(), request.path.clone());
        self.calls.lock().unwrap().push(request);

        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().expect("non-empty queue"),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(CommerceError::Api(format!("no fake response for {} {}", key.0, key.1))),
        }
    }
}

pub(crate) fn page(items: Vec<Value>, has_more: bool) -> Value {
    json!({
        "data": items,
        "pagination": {
            "count": items.len(),
            "limit": 25,
            "offset": 0,
            "hasMore": has_more
        }
    })
}

pub(crate) fn listing(id: &str, title: &str, description: &str, price_cents: i64) -> Value {
    json!({
        "id": id,
        "productId": format!("prd_{id}"),
        "storeId": "sto_1",
        "storeName": "Lamps & Co",
        "storeAgentName": "mer_1",
        "storeTrustScore": 70,
        "product": {
            "id": format!("prd_{id}"),
            "storeId": "sto_1",
            "title": title,
            "description": description,
            "category": "Home",
            "imageUrls": [],
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        },
        "priceCents": price_cents,
        "currency": "USD",
        "inventory": 5,
        "status": "ACTIVE",
        "reviewCount": 0,
        "averageRating": null,
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    })
}

pub(crate) fn listings(prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| listing(&format!("{prefix}{i}"), &format!("Item {i}"), "plain", 1000))
        .collect()
}

pub(crate) fn store(id: &str, shipping_policy: Option<&str>) -> Value {
    json!({
        "id": id,
        "agentId": "mer_1",
        "agentName": "merchant",
        "storeName": format!("Store {id}"),
        "shippingPolicy": shipping_policy,
        "trustScore": 50,
        "productCount": 1,
        "activeListingCount": 1,
        "totalSales": 0,
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    })
}

pub(crate) fn offer(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "listing_id": "lst_1",
        "customer_id": "cus_1",
        "customer_name": "Ada",
        "store_id": "sto_1",
        "store_name": "Lamps & Co",
        "offer_price_cents": 1200,
        "currency": "USD",
        "status": status,
        "expires_at": "2026-01-08T00:00:00Z",
        "created_at": "2026-01-01T00:00:00Z"
    })
}

pub(crate) fn order(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "customer_id": "cus_1",
        "customer_name": "Ada",
        "store_id": "sto_1",
        "store_name": "Lamps & Co",
        "listing_id": "lst_1",
        "price_cents": 1599,
        "currency": "USD",
        "status": status,
        "created_at": "2026-01-01T00:00:00Z"
    })
}

pub(crate) fn activity(id: &str) -> Value {
    json!({
        "id": id,
        "event_type": "LISTING_CREATED",
        "agent_id": "mer_1",
        "agent_name": "merchant",
        "metadata": {},
        "created_at": "2026-01-01T00:00:00Z"
    })
}
