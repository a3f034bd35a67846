//! Render-time formatting. Amounts stay in integer cents everywhere else;
//! this is the only place they are turned into a decimal string.

use chrono::{DateTime, Utc};

use crate::models::{OfferStatus, Order, OrderStatus};

/// Badge styling bucket for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Default,
    Success,
    Warning,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustTier {
    Trusted,
    Established,
    BuildingTrust,
    New,
}

impl TrustTier {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Trusted,
            60..=79 => Self::Established,
            40..=59 => Self::BuildingTrust,
            _ => Self::New,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Trusted => "Trusted",
            Self::Established => "Established",
            Self::BuildingTrust => "Building Trust",
            Self::New => "New",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Trusted => Tone::Success,
            Self::Established => Tone::Default,
            Self::BuildingTrust => Tone::Warning,
            Self::New => Tone::Destructive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryLevel {
    OutOfStock,
    Low,
    InStock,
}

impl InventoryLevel {
    pub fn from_count(inventory: u32) -> Self {
        match inventory {
            0 => Self::OutOfStock,
            1..=5 => Self::Low,
            _ => Self::InStock,
        }
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// `1599, "USD"` → `"$15.99"`, `123456789, "USD"` → `"$1,234,567.89"`.
/// Currencies without a known symbol are prefixed with their code.
pub fn format_price(cents: i64, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = group_thousands(cents / 100);
    let fraction = cents % 100;

    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{whole}.{fraction:02}"),
        None => format!("{sign}{currency} {whole}.{fraction:02}"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn trust_label(score: u32) -> &'static str {
    TrustTier::from_score(score).label()
}

pub fn order_status_tone(status: OrderStatus) -> Tone {
    match status {
        OrderStatus::Delivered => Tone::Success,
        OrderStatus::Cancelled | OrderStatus::Refunded => Tone::Destructive,
        OrderStatus::Placed | OrderStatus::Paid | OrderStatus::Processing => Tone::Warning,
        OrderStatus::Shipped => Tone::Default,
    }
}

pub fn offer_status_tone(status: OfferStatus) -> Tone {
    match status {
        OfferStatus::Accepted | OfferStatus::Purchased => Tone::Success,
        OfferStatus::Rejected | OfferStatus::Expired => Tone::Destructive,
        OfferStatus::Pending => Tone::Warning,
    }
}

/// `SOLD_OUT` → `Sold Out`.
pub fn status_label(raw: &str) -> String {
    raw.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn order_status_label(status: OrderStatus) -> String {
    status_label(status.as_str())
}

pub fn offer_status_label(status: OfferStatus) -> String {
    status_label(status.as_str())
}

/// Coarse "N units ago" relative to `now`.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let seconds = (now - at).num_seconds();
    let (count, unit) = match seconds {
        s if s < MINUTE => return "just now".to_string(),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < WEEK => (s / DAY, "day"),
        s if s < MONTH => (s / WEEK, "week"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}

/// Only delivered orders with a recorded delivery time can be reviewed.
pub fn can_review_order(order: &Order) -> bool {
    order.status == OrderStatus::Delivered && order.delivered_at.is_some()
}

pub fn inventory_text(inventory: u32) -> String {
    match InventoryLevel::from_count(inventory) {
        InventoryLevel::OutOfStock => "Out of stock".to_string(),
        InventoryLevel::Low => format!("Only {inventory} left!"),
        InventoryLevel::InStock => format!("{inventory} in stock"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn prices() {
        assert_eq!(format_price(1599, "USD"), "$15.99");
        assert_eq!(format_price(5, "USD"), "$0.05");
        assert_eq!(format_price(123_456_789, "USD"), "$1,234,567.89");
        assert_eq!(format_price(-250, "EUR"), "-€2.50");
        assert_eq!(format_price(100_000, "CHF"), "CHF 1,000.00");
    }

    #[test]
    fn trust_tiers() {
        assert_eq!(trust_label(100), "Trusted");
        assert_eq!(trust_label(80), "Trusted");
        assert_eq!(trust_label(79), "Established");
        assert_eq!(trust_label(60), "Established");
        assert_eq!(trust_label(40), "Building Trust");
        assert_eq!(trust_label(39), "New");
        assert_eq!(trust_label(0), "New");
    }

    #[test]
    fn tones_and_labels() {
        assert_eq!(order_status_tone(OrderStatus::Refunded), Tone::Destructive);
        assert_eq!(order_status_tone(OrderStatus::Paid), Tone::Warning);
        assert_eq!(offer_status_tone(OfferStatus::Purchased), Tone::Success);
        assert_eq!(status_label("SOLD_OUT"), "Sold Out");
        assert_eq!(order_status_label(OrderStatus::Processing), "Processing");
        assert_eq!(offer_status_label(OfferStatus::Expired), "Expired");
    }

    #[test]
    fn relative_times() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::seconds(30), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2 days ago");
        assert_eq!(relative_time(now - Duration::days(14), now), "2 weeks ago");
        assert_eq!(relative_time(now - Duration::days(400), now), "1 year ago");
    }

    #[test]
    fn inventory() {
        assert_eq!(inventory_text(0), "Out of stock");
        assert_eq!(inventory_text(5), "Only 5 left!");
        assert_eq!(inventory_text(6), "6 in stock");
    }

    #[test]
    fn review_eligibility() {
        let mut order: Order = serde_json::from_value(serde_json::json!({
            "id": "ord_1",
            "customer_id": "cus_1",
            "listing_id": "lst_1",
            "price_cents": 1599,
            "status": "DELIVERED",
            "created_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(!can_review_order(&order));

        order.delivered_at = Some(Utc::now());
        assert!(can_review_order(&order));

        order.status = OrderStatus::Shipped;
        assert!(!can_review_order(&order));
    }
}
