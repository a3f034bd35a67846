use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_currency() -> String {
    "USD".to_string()
}

/// Role an agent plays in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentType {
    Merchant,
    Customer,
}

impl AgentType {
    /// Parses the `agentType` carried on an agent profile; unknown or
    /// missing values mean the agent has no commerce role yet.
    pub fn from_profile(agent_type: Option<&str>) -> Option<Self> {
        match agent_type? {
            "MERCHANT" => Some(Self::Merchant),
            "CUSTOMER" => Some(Self::Customer),
            _ => None,
        }
    }

    pub fn is_merchant(self) -> bool {
        self == Self::Merchant
    }

    pub fn is_customer(self) -> bool {
        self == Self::Customer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Active,
    SoldOut,
    Inactive,
}

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::SoldOut => "SOLD_OUT",
            Self::Inactive => "INACTIVE",
        }
    }
}

/// Offer lifecycle. Only `Pending` can move; every other state is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
    Purchased,
}

impl OfferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
            Self::Purchased => "PURCHASED",
        }
    }

    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Paid => "PAID",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Refunded => "REFUNDED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityEventType {
    StoreCreated,
    ProductCreated,
    ListingCreated,
    ListingSold,
    OfferMade,
    OfferAccepted,
    ReviewPosted,
    PriceUpdated,
}

/// Merchant storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub agent_id: String,
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_display_name: Option<String>,
    pub store_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<String>,
    pub trust_score: u32,
    pub product_count: u32,
    pub active_listing_count: u32,
    pub total_sales: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub store_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A store's priced, inventoried offer of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub product_id: String,
    pub store_id: String,
    pub store_name: String,
    pub store_agent_name: String,
    pub store_trust_score: u32,
    pub product: Product,
    pub price_cents: i64,
    pub currency: String,
    pub inventory: u32,
    pub status: ListingStatus,
    pub review_count: u32,
    pub average_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A buyer-proposed price on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    #[serde(alias = "listing_id")]
    pub listing_id: String,
    #[serde(alias = "customer_id")]
    pub customer_id: String,
    #[serde(alias = "customer_name", default)]
    pub customer_name: String,
    #[serde(alias = "store_id", default)]
    pub store_id: String,
    #[serde(alias = "store_name", default)]
    pub store_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing: Option<Listing>,
    #[serde(alias = "offer_price_cents")]
    pub offer_price_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: OfferStatus,
    #[serde(alias = "expires_at")]
    pub expires_at: DateTime<Utc>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updated_at", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(alias = "response_message", default, skip_serializing_if = "Option::is_none")]
    pub response_message: Option<String>,
    #[serde(alias = "responded_at", default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
}

/// A confirmed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(alias = "customer_id")]
    pub customer_id: String,
    #[serde(alias = "customer_name", default)]
    pub customer_name: String,
    #[serde(alias = "store_id", default)]
    pub store_id: String,
    #[serde(alias = "store_name", default)]
    pub store_name: String,
    #[serde(alias = "listing_id")]
    pub listing_id: String,
    #[serde(alias = "offer_id", default, skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing: Option<Listing>,
    #[serde(alias = "price_cents")]
    pub price_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub status: OrderStatus,
    #[serde(alias = "shipped_at", default, skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<DateTime<Utc>>,
    #[serde(alias = "delivered_at", default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(alias = "tracking_number", default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updated_at", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    #[serde(alias = "order_id")]
    pub order_id: String,
    #[serde(alias = "listing_id")]
    pub listing_id: String,
    #[serde(alias = "customer_id")]
    pub customer_id: String,
    #[serde(alias = "customer_name", default)]
    pub customer_name: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustDimensions {
    #[serde(alias = "product_satisfaction")]
    pub product_satisfaction: f64,
    #[serde(alias = "shipping_reliability")]
    pub shipping_reliability: f64,
    #[serde(alias = "support_responsiveness")]
    pub support_responsiveness: f64,
    #[serde(alias = "policy_clarity")]
    pub policy_clarity: f64,
    #[serde(alias = "price_consistency")]
    pub price_consistency: f64,
}

/// Partial dimension deltas attached to a trust event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustDimensionDeltas {
    #[serde(alias = "product_satisfaction", default, skip_serializing_if = "Option::is_none")]
    pub product_satisfaction: Option<f64>,
    #[serde(alias = "shipping_reliability", default, skip_serializing_if = "Option::is_none")]
    pub shipping_reliability: Option<f64>,
    #[serde(alias = "support_responsiveness", default, skip_serializing_if = "Option::is_none")]
    pub support_responsiveness: Option<f64>,
    #[serde(alias = "policy_clarity", default, skip_serializing_if = "Option::is_none")]
    pub policy_clarity: Option<f64>,
    #[serde(alias = "price_consistency", default, skip_serializing_if = "Option::is_none")]
    pub price_consistency: Option<f64>,
}

/// Backend-computed reputation aggregate for a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustProfile {
    #[serde(alias = "store_id")]
    pub store_id: String,
    #[serde(alias = "overall_score")]
    pub overall_score: f64,
    #[serde(default)]
    pub dimensions: TrustDimensions,
    #[serde(alias = "total_reviews", default)]
    pub total_reviews: u32,
    #[serde(alias = "total_orders", default)]
    pub total_orders: u32,
    #[serde(alias = "honored_offers", default)]
    pub honored_offers: u32,
    #[serde(alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustEvent {
    pub id: String,
    #[serde(alias = "store_id")]
    pub store_id: String,
    #[serde(alias = "event_type")]
    pub event_type: String,
    #[serde(default)]
    pub impact: f64,
    #[serde(default)]
    pub dimensions: TrustDimensionDeltas,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: String,
    #[serde(alias = "event_type")]
    pub event_type: ActivityEventType,
    #[serde(alias = "agent_id")]
    pub agent_id: String,
    #[serde(alias = "agent_name", default)]
    pub agent_name: String,
    #[serde(alias = "store_id", default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(alias = "store_name", default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(alias = "listing_id", default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(alias = "listing_title", default, skip_serializing_if = "Option::is_none")]
    pub listing_title: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    #[serde(alias = "store_id")]
    pub store_id: String,
    #[serde(alias = "store_name")]
    pub store_name: String,
    #[serde(alias = "agent_name", default)]
    pub agent_name: String,
    #[serde(alias = "trust_score", default)]
    pub trust_score: u32,
    #[serde(alias = "total_sales", default)]
    pub total_sales: u32,
    #[serde(alias = "review_count", default)]
    pub review_count: u32,
    #[serde(alias = "average_rating", default)]
    pub average_rating: f64,
}

/// A buyer's public request for something not yet listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookingForItem {
    pub id: String,
    #[serde(alias = "agent_id")]
    pub agent_id: String,
    #[serde(alias = "agent_name", default)]
    pub agent_name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(alias = "has_more", default)]
    pub has_more: bool,
}

/// Paginated list envelope: `{data, pagination}`.
///
/// The pagination block is typed on the client; the proxy keeps it as raw
/// JSON (`Page<T, Value>`) so it is returned exactly as the backend sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T, P = Pagination> {
    pub data: Vec<T>,
    pub pagination: P,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn offer_accepts_backend_snake_case() {
        let offer: Offer = serde_json::from_value(json!({
            "id": "off_1",
            "listing_id": "lst_1",
            "customer_id": "cus_1",
            "customer_name": "Ada",
            "offer_price_cents": 1250,
            "status": "PENDING",
            "expires_at": "2026-01-08T00:00:00Z",
            "created_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(offer.listing_id, "lst_1");
        assert_eq!(offer.offer_price_cents, 1250);
        assert_eq!(offer.currency, "USD");
        assert!(offer.status.is_pending());
    }

    #[test]
    fn order_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
        assert!(!OrderStatus::Placed.is_terminal());
    }

    #[test]
    fn pagination_reads_either_has_more_spelling() {
        let a: Pagination = serde_json::from_value(json!({"count": 1, "limit": 25, "offset": 0, "hasMore": true})).unwrap();
        let b: Pagination = serde_json::from_value(json!({"count": 1, "limit": 25, "offset": 0, "has_more": true})).unwrap();
        assert_eq!(a, b);
        assert!(a.has_more);
    }

    #[test]
    fn agent_role_from_profile() {
        assert_eq!(AgentType::from_profile(Some("MERCHANT")), Some(AgentType::Merchant));
        assert!(AgentType::from_profile(Some("CUSTOMER")).unwrap().is_customer());
        assert_eq!(AgentType::from_profile(Some("ADMIN")), None);
        assert_eq!(AgentType::from_profile(None), None);
    }
}
