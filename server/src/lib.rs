//! Storefront commerce layer
//!
//! A typed client for the commerce API with keyed request deduplication,
//! paginated state containers, and the local proxy that fronts the
//! external commerce backend.

pub mod app_state;
pub mod cache;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod proxy;
pub mod routes;
pub mod state;
pub mod transform;

pub use cache::{CacheKey, CachePolicy, CommerceResources, Resource, ResourceCache};
pub use client::CommerceClient;
pub use error::{CommerceError, ProxyError};
