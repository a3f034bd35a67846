//! Proxy handlers for `/api/commerce/*`.
//!
//! Listings and stores are reshaped into view models on the way out; every
//! other resource is handed back exactly as the backend sent it.

pub mod listings;
pub mod resources;
pub mod stores;

use serde::Deserialize;

/// Query parameters forwarded to the backend. Anything else is dropped, as
/// are empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ForwardQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub status: Option<String>,
    pub store_id: Option<String>,
}

impl ForwardQuery {
    pub fn pairs(&self) -> Vec<(String, String)> {
        [
            ("limit", &self.limit),
            ("offset", &self.offset),
            ("status", &self.status),
            ("store_id", &self.store_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|value| !value.is_empty())
                .map(|value| (key.to_string(), value.to_string()))
        })
        .collect()
    }
}

pub async fn root() -> &'static str {
    "Storefront API Server"
}

pub async fn health_check() -> &'static str {
    "OK"
}
