use serde::Deserialize;
use tokio::sync::Mutex;

use super::list::{load_page, write_failed, DetailSlot, ListState, LoadOutcome, PageRequest};
use crate::client::{CommerceClient, ListingQuery};
use crate::error::CommerceError;
use crate::models::{CreateListingForm, Listing, ListingStatus, UpdateListingPriceForm};

/// Search pulls one page of this size and filters it locally; matches past
/// it are not reachable until the backend can search.
pub const SEARCH_FETCH_CAP: u32 = 100;

/// The only filters the listing catalog understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListingFilters {
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub status: Option<ListingStatus>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ListingFilters {
    /// Lowercased search text, if any is set.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    fn query(&self, limit: Option<u32>, offset: u32) -> ListingQuery {
        ListingQuery {
            store_id: self.store_id.clone(),
            status: self.status,
            limit,
            offset: Some(offset),
        }
    }
}

fn matches_search(listing: &Listing, term: &str) -> bool {
    listing.product.title.to_lowercase().contains(term)
        || listing.product.description.to_lowercase().contains(term)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingCatalogState {
    pub listings: ListState<Listing>,
    pub filters: ListingFilters,
    pub current: DetailSlot<Listing>,
    pub write_error: Option<String>,
}

fn listings(state: &mut ListingCatalogState) -> &mut ListState<Listing> {
    &mut state.listings
}

pub struct ListingCatalog {
    client: CommerceClient,
    state: Mutex<ListingCatalogState>,
}

impl ListingCatalog {
    pub fn new(client: CommerceClient) -> Self {
        Self {
            client,
            state: Mutex::new(ListingCatalogState::default()),
        }
    }

    pub async fn snapshot(&self) -> ListingCatalogState {
        self.state.lock().await.clone()
    }

    pub async fn load_listings(&self, reset: bool) -> LoadOutcome {
        self.fetch_listings(PageRequest::from_reset(reset)).await
    }

    pub async fn load_more(&self) -> LoadOutcome {
        self.fetch_listings(PageRequest::More).await
    }

    async fn fetch_listings(&self, request: PageRequest) -> LoadOutcome {
        let client = &self.client;
        load_page(
            &self.state,
            listings,
            request,
            |state| state.filters.clone(),
            |offset, filters| async move {
                match filters.search_term() {
                    Some(term) => {
                        let query = filters.query(Some(SEARCH_FETCH_CAP), 0);
                        let page = client.get_listings(&query).await?;
                        let hits: Vec<Listing> = page
                            .data
                            .into_iter()
                            .filter(|listing| matches_search(listing, &term))
                            .collect();
                        Ok::<_, CommerceError>((hits, false))
                    }
                    None => {
                        let page = client.get_listings(&filters.query(None, offset)).await?;
                        Ok((page.data, page.pagination.has_more))
                    }
                }
            },
        )
        .await
    }

    /// Replaces the active filters, drops every loaded page and reloads.
    /// A load still running for the old filters is discarded when it lands.
    pub async fn set_filters(&self, filters: ListingFilters) -> LoadOutcome {
        {
            let mut state = self.state.lock().await;
            state.filters = filters;
            state.listings.reset();
        }
        self.load_listings(true).await
    }

    pub async fn load_listing(&self, id: &str) -> LoadOutcome {
        let ticket = self.state.lock().await.current.begin();
        let result = self.client.get_listing(id).await;
        self.state.lock().await.current.settle(ticket, result)
    }

    pub async fn set_current(&self, listing: Option<Listing>) {
        self.state.lock().await.current.set(listing);
    }

    pub async fn create_listing(&self, store_id: &str, form: &CreateListingForm) -> Result<Listing, CommerceError> {
        let result = self.client.create_listing(store_id, form).await;
        let mut state = self.state.lock().await;
        match result {
            Ok(listing) => {
                state.write_error = None;
                state.listings.prepend(listing.clone());
                Ok(listing)
            }
            Err(err) => Err(write_failed(&mut state.write_error, "create listing", err)),
        }
    }

    pub async fn update_price(&self, id: &str, form: &UpdateListingPriceForm) -> Result<Listing, CommerceError> {
        let result = self.client.update_listing_price(id, form).await;
        let mut state = self.state.lock().await;
        match result {
            Ok(listing) => {
                state.write_error = None;
                state.listings.replace(&listing);
                state.current.replace(&listing);
                Ok(listing)
            }
            Err(err) => Err(write_failed(&mut state.write_error, "update listing price", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{self, FakeTransport};
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;

    const LISTINGS: &str = "/api/commerce/listings";

    fn catalog(fake: &Arc<FakeTransport>) -> ListingCatalog {
        ListingCatalog::new(CommerceClient::new(fake.clone()))
    }

    #[tokio::test]
    async fn two_pages_then_exhausted() {
        let fake = FakeTransport::new();
        fake.respond(Method::GET, LISTINGS, Ok(fake::page(fake::listings("a", 25), true)));
        fake.respond(Method::GET, LISTINGS, Ok(fake::page(fake::listings("b", 10), false)));
        let catalog = catalog(&fake);

        assert_eq!(catalog.load_listings(true).await, LoadOutcome::Loaded);
        let state = catalog.snapshot().await;
        assert_eq!(state.listings.items.len(), 25);
        assert_eq!(state.listings.offset, 25);
        assert!(state.listings.has_more);

        assert_eq!(catalog.load_more().await, LoadOutcome::Loaded);
        assert_eq!(fake.last_call().unwrap().query_value("offset"), Some("25"));
        let state = catalog.snapshot().await;
        assert_eq!(state.listings.items.len(), 35);
        assert_eq!(state.listings.offset, 35);
        assert!(!state.listings.has_more);

        assert_eq!(catalog.load_more().await, LoadOutcome::Skipped);
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn load_failure_keeps_loaded_pages() {
        let fake = FakeTransport::new();
        fake.respond(Method::GET, LISTINGS, Ok(fake::page(fake::listings("a", 25), true)));
        fake.respond(Method::GET, LISTINGS, Err(CommerceError::Api("Backend unavailable".into())));
        let catalog = catalog(&fake);

        catalog.load_listings(true).await;
        assert_eq!(catalog.load_more().await, LoadOutcome::Failed);

        let state = catalog.snapshot().await;
        assert_eq!(state.listings.items.len(), 25);
        assert_eq!(state.listings.offset, 25);
        assert_eq!(state.listings.error.as_deref(), Some("Backend unavailable"));
        assert!(!state.listings.is_loading);
    }

    #[tokio::test]
    async fn search_filters_one_capped_page_locally() {
        let fake = FakeTransport::new();
        fake.respond(
            Method::GET,
            LISTINGS,
            Ok(fake::page(
                vec![
                    fake::listing("l1", "Brass LAMP", "warm light", 1000),
                    fake::listing("l2", "Chair", "oak", 1000),
                    fake::listing("l3", "Desk", "fits a lamp", 1000),
                ],
                true,
            )),
        );
        let catalog = catalog(&fake);

        let filters = ListingFilters {
            store_id: Some("sto_1".to_string()),
            search: Some("  Lamp ".to_string()),
            ..Default::default()
        };
        catalog.set_filters(filters).await;

        let call = fake.last_call().unwrap();
        assert_eq!(call.query_value("limit"), Some("100"));
        assert_eq!(call.query_value("offset"), Some("0"));
        assert_eq!(call.query_value("store_id"), Some("sto_1"));

        let state = catalog.snapshot().await;
        let ids: Vec<_> = state.listings.items.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["l1", "l3"]);
        assert!(!state.listings.has_more);
        assert_eq!(catalog.load_more().await, LoadOutcome::Skipped);
    }

    #[tokio::test]
    async fn filter_change_discards_in_flight_response() {
        let fake = FakeTransport::new();
        fake.respond(Method::GET, LISTINGS, Ok(fake::page(fake::listings("x", 4), true)));
        let gate = fake.gate(Method::GET, LISTINGS);
        let catalog = catalog(&fake);

        let first = ListingFilters {
            store_id: Some("sto_a".to_string()),
            ..Default::default()
        };
        let second = ListingFilters {
            store_id: Some("sto_b".to_string()),
            ..Default::default()
        };

        let (old, new, _) = tokio::join!(
            catalog.set_filters(first),
            async {
                tokio::task::yield_now().await;
                catalog.set_filters(second.clone()).await
            },
            async {
                for _ in 0..3 {
                    tokio::task::yield_now().await;
                }
                gate.add_permits(2);
            }
        );

        assert_eq!(old, LoadOutcome::Stale);
        assert_eq!(new, LoadOutcome::Loaded);
        let state = catalog.snapshot().await;
        assert_eq!(state.filters, second);
        assert_eq!(state.listings.items.len(), 4);
        assert_eq!(state.listings.offset, 4);
        assert!(!state.listings.is_loading);
    }

    #[tokio::test]
    async fn price_update_patches_list_and_current() {
        let fake = FakeTransport::new();
        fake.respond(
            Method::GET,
            LISTINGS,
            Ok(fake::page(
                vec![
                    fake::listing("lst_1", "Lamp", "brass", 1599),
                    fake::listing("lst_2", "Chair", "oak", 4000),
                ],
                false,
            )),
        );
        fake.respond(
            Method::GET,
            "/api/commerce/listings/lst_1",
            Ok(json!({ "listing": fake::listing("lst_1", "Lamp", "brass", 1599) })),
        );
        fake.respond(
            Method::PATCH,
            "/api/commerce/listings/lst_1/price",
            Ok(json!({ "listing": fake::listing("lst_1", "Lamp", "brass", 2500) })),
        );
        let catalog = catalog(&fake);
        catalog.load_listings(true).await;
        assert_eq!(catalog.load_listing("lst_1").await, LoadOutcome::Loaded);

        let form = UpdateListingPriceForm {
            new_price_cents: 2500,
            reason: "sale".to_string(),
        };
        let updated = catalog.update_price("lst_1", &form).await.unwrap();
        assert_eq!(updated.price_cents, 2500);

        let body = fake.last_call().unwrap().body.unwrap();
        assert_eq!(body, json!({ "newPriceCents": 2500, "reason": "sale" }));

        let state = catalog.snapshot().await;
        assert_eq!(state.listings.items[0].price_cents, 2500);
        assert_eq!(state.listings.items[1].price_cents, 4000);
        assert_eq!(state.current.value.unwrap().price_cents, 2500);
    }

    #[tokio::test]
    async fn detail_load_does_not_touch_list_flags() {
        let fake = FakeTransport::new();
        fake.respond(
            Method::GET,
            "/api/commerce/listings/lst_9",
            Err(CommerceError::Api("Listing not found".into())),
        );
        let catalog = catalog(&fake);

        assert_eq!(catalog.load_listing("lst_9").await, LoadOutcome::Failed);
        let state = catalog.snapshot().await;
        assert_eq!(state.current.error.as_deref(), Some("Listing not found"));
        assert_eq!(state.listings.error, None);
        assert!(!state.listings.is_loading);
    }

    #[test]
    fn filters_reject_unknown_keys() {
        let parsed: ListingFilters = serde_json::from_value(json!({ "storeId": "sto_1", "status": "ACTIVE" })).unwrap();
        assert_eq!(parsed.status, Some(ListingStatus::Active));
        assert!(serde_json::from_value::<ListingFilters>(json!({ "category": "Home" })).is_err());
    }
}
