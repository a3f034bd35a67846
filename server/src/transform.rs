//! Wire → view model transformers.
//!
//! The commerce backend emits flat snake_case records; the storefront works
//! with nested camelCase models. These functions are pure: the same wire
//! record always produces the same view model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Listing, Page, Product, Store, WireListing, WireStore};

const PLACEHOLDER_HOST: &str = "https://picsum.photos/seed";
const PLACEHOLDER_SEEDS: u32 = 1000;
const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Resolves product image paths into absolute URLs.
///
/// Uploaded media is not served by the backend yet, so relative paths are
/// replaced with a placeholder picked deterministically from the product id.
/// Swap this out once real media storage exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResolver {
    origin: String,
}

impl MediaResolver {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve_image_url(&self, path: Option<&str>, product_id: Option<&str>) -> Option<String> {
        let path = path.filter(|p| !p.is_empty())?;
        if path.starts_with("http") {
            return Some(path.to_string());
        }

        match product_id.filter(|id| !id.is_empty()) {
            Some(id) => Some(placeholder_url(id)),
            None => Some(format!("{}{}", self.origin, path)),
        }
    }
}

fn placeholder_url(product_id: &str) -> String {
    let hash: u32 = product_id.chars().map(|c| c as u32).fold(0, u32::wrapping_add);
    format!("{}/{}/600/600", PLACEHOLDER_HOST, hash % PLACEHOLDER_SEEDS)
}

pub fn transform_listing(wire: WireListing, media: &MediaResolver) -> Listing {
    let image_urls = media
        .resolve_image_url(wire.primary_image_url.as_deref(), Some(wire.product_id.as_str()))
        .into_iter()
        .collect();

    let product = Product {
        id: wire.product_id.clone(),
        store_id: wire.store_id.clone(),
        title: wire.product_title,
        description: wire.product_description,
        category: wire
            .product_category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        image_urls,
        created_at: wire.created_at,
        updated_at: wire.updated_at,
    };

    Listing {
        id: wire.id,
        product_id: wire.product_id,
        store_id: wire.store_id,
        store_name: wire.store_name,
        store_agent_name: wire
            .store_agent_name
            .filter(|n| !n.is_empty())
            .unwrap_or(wire.owner_merchant_id),
        store_trust_score: wire.store_trust_score.unwrap_or(0),
        product,
        price_cents: wire.price_cents,
        currency: wire.currency,
        inventory: wire.inventory_on_hand,
        status: wire.status,
        review_count: wire.review_count.unwrap_or(0),
        // a zero average means "no ratings yet"
        average_rating: wire.average_rating.filter(|r| *r > 0.0),
        created_at: wire.created_at,
        updated_at: wire.updated_at,
    }
}

pub fn transform_store(wire: WireStore) -> Store {
    Store {
        id: wire.id,
        agent_name: wire
            .agent_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| wire.merchant_id.clone()),
        agent_id: wire.merchant_id,
        agent_display_name: wire.agent_display_name,
        store_name: wire.store_name,
        tagline: wire.tagline,
        description: wire.description,
        shipping_policy: wire.shipping_policy,
        return_policy: wire.return_policy,
        trust_score: wire.trust_score.unwrap_or(0),
        product_count: wire.product_count.unwrap_or(0),
        active_listing_count: wire.active_listing_count.unwrap_or(0),
        total_sales: wire.total_sales.unwrap_or(0),
        created_at: wire.created_at,
        updated_at: wire.updated_at,
    }
}

/// Maps `data` through the listing transformer; `pagination` is untouched.
pub fn transform_listings_page(page: Page<WireListing, Value>, media: &MediaResolver) -> Page<Listing, Value> {
    Page {
        data: page
            .data
            .into_iter()
            .map(|wire| transform_listing(wire, media))
            .collect(),
        pagination: page.pagination,
    }
}

pub fn transform_stores_page(page: Page<WireStore, Value>) -> Page<Store, Value> {
    Page {
        data: page.data.into_iter().map(transform_store).collect(),
        pagination: page.pagination,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEnvelope {
    pub listing: Listing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreEnvelope {
    pub store: Store,
}

/// Accepts `{listing: ...}` or `{data: ...}`.
pub fn transform_listing_envelope(body: Value, media: &MediaResolver) -> Result<ListingEnvelope, serde_json::Error> {
    let wire: WireListing = serde_json::from_value(unwrap_entity(body, "listing"))?;
    Ok(ListingEnvelope {
        listing: transform_listing(wire, media),
    })
}

/// Accepts `{store: ...}` or `{data: ...}`.
pub fn transform_store_envelope(body: Value) -> Result<StoreEnvelope, serde_json::Error> {
    let wire: WireStore = serde_json::from_value(unwrap_entity(body, "store"))?;
    Ok(StoreEnvelope {
        store: transform_store(wire),
    })
}

fn unwrap_entity(mut body: Value, key: &str) -> Value {
    match body.get_mut(key).map(Value::take) {
        Some(entity) if !entity.is_null() => entity,
        _ => body.get_mut("data").map(Value::take).unwrap_or(Value::Null),
    }
}
