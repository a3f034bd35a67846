use serde::Serialize;

use crate::models::{ListingStatus, OfferStatus, OrderStatus};

/// Plain `limit`/`offset` window; unset fields fall back to the endpoint's
/// default page size and offset 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PageParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageParams {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Endpoint default page size, starting at `offset`.
    pub fn starting_at(offset: u32) -> Self {
        Self {
            limit: None,
            offset: Some(offset),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ListingQuery {
    pub store_id: Option<String>,
    pub status: Option<ListingStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct OfferQuery {
    pub status: Option<OfferStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
