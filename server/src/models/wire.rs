//! Flat, snake_case records exactly as the commerce backend emits them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ListingStatus;

/// Field decoders for aggregates the backend may send as numeric strings
/// (`"4.5000"`, `"3"`) and display text it may send as `null`.
mod lenient {
    use serde::{de, Deserialize, Deserializer};
    use serde_json::Value;

    fn number(value: &Value) -> Option<f64> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(number))
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?
            .as_ref()
            .and_then(number)
            .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32))
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(deserializer)?;
        number(&value)
            .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
            .ok_or_else(|| de::Error::custom(format!("expected a non-negative count, got {value}")))
    }

    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let parsed = match &value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| de::Error::custom(format!("expected an integer amount, got {value}")))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireListing {
    pub id: String,
    pub store_id: String,
    pub product_id: String,
    #[serde(deserialize_with = "lenient::amount")]
    pub price_cents: i64,
    pub currency: String,
    #[serde(deserialize_with = "lenient::count")]
    pub inventory_on_hand: u32,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub product_title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub product_description: String,
    #[serde(default)]
    pub product_category: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub store_name: String,
    #[serde(default)]
    pub store_agent_name: Option<String>,
    pub owner_merchant_id: String,
    #[serde(default)]
    pub primary_image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub store_trust_score: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub review_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireStore {
    pub id: String,
    pub merchant_id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub agent_display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub store_name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub shipping_policy: Option<String>,
    #[serde(default)]
    pub return_policy: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub trust_score: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub product_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub active_listing_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_sales: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
