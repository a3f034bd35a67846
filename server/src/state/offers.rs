use tokio::sync::Mutex;

use super::list::{load_page, write_failed, DetailSlot, ListState, LoadOutcome, PageRequest};
use crate::client::{CommerceClient, OfferQuery};
use crate::error::CommerceError;
use crate::models::{CreateOfferForm, Offer, RespondToOfferForm};

/// Offers the agent made (`mine`) and offers made on one of the agent's
/// stores (`incoming`). The two lists page independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferBookState {
    pub mine: ListState<Offer>,
    pub incoming: ListState<Offer>,
    pub incoming_store: Option<String>,
    pub current: DetailSlot<Offer>,
    pub write_error: Option<String>,
}

fn mine(state: &mut OfferBookState) -> &mut ListState<Offer> {
    &mut state.mine
}

fn incoming(state: &mut OfferBookState) -> &mut ListState<Offer> {
    &mut state.incoming
}

fn page_at(offset: u32) -> OfferQuery {
    OfferQuery {
        offset: Some(offset),
        ..Default::default()
    }
}

pub struct OfferBook {
    client: CommerceClient,
    state: Mutex<OfferBookState>,
}

impl OfferBook {
    pub fn new(client: CommerceClient) -> Self {
        Self {
            client,
            state: Mutex::new(OfferBookState::default()),
        }
    }

    pub async fn snapshot(&self) -> OfferBookState {
        self.state.lock().await.clone()
    }

    pub async fn load_my_offers(&self, reset: bool) -> LoadOutcome {
        self.fetch_mine(PageRequest::from_reset(reset)).await
    }

    pub async fn load_more_mine(&self) -> LoadOutcome {
        self.fetch_mine(PageRequest::More).await
    }

    async fn fetch_mine(&self, request: PageRequest) -> LoadOutcome {
        let client = &self.client;
        load_page(&self.state, mine, request, |_| (), |offset, ()| async move {
            let page = client.get_my_offers(&page_at(offset)).await?;
            Ok::<_, CommerceError>((page.data, page.pagination.has_more))
        })
        .await
    }

    /// Loads offers on `store_id`. Switching to another store starts the
    /// incoming list over.
    pub async fn load_store_offers(&self, store_id: &str, reset: bool) -> LoadOutcome {
        let request = {
            let mut state = self.state.lock().await;
            if state.incoming_store.as_deref() == Some(store_id) {
                PageRequest::from_reset(reset)
            } else {
                state.incoming.reset();
                state.incoming_store = Some(store_id.to_string());
                PageRequest::Reset
            }
        };
        self.fetch_incoming(request).await
    }

    /// Next page of the incoming list for whichever store it currently holds.
    pub async fn load_more_incoming(&self) -> LoadOutcome {
        if self.state.lock().await.incoming_store.is_none() {
            return LoadOutcome::Skipped;
        }
        self.fetch_incoming(PageRequest::More).await
    }

    async fn fetch_incoming(&self, request: PageRequest) -> LoadOutcome {
        let client = &self.client;
        load_page(
            &self.state,
            incoming,
            request,
            |state| state.incoming_store.clone(),
            |offset, store_id| async move {
                let Some(store_id) = store_id else {
                    return Ok::<_, CommerceError>((Vec::new(), false));
                };
                let page = client.get_store_offers(&store_id, &page_at(offset)).await?;
                Ok((page.data, page.pagination.has_more))
            },
        )
        .await
    }

    pub async fn load_offer(&self, id: &str) -> LoadOutcome {
        let ticket = self.state.lock().await.current.begin();
        let result = self.client.get_offer(id).await;
        self.state.lock().await.current.settle(ticket, result)
    }

    pub async fn set_current(&self, offer: Option<Offer>) {
        self.state.lock().await.current.set(offer);
    }

    pub async fn create_offer(&self, listing_id: &str, form: &CreateOfferForm) -> Result<Offer, CommerceError> {
        let result = self.client.create_offer(listing_id, form).await;
        let mut state = self.state.lock().await;
        match result {
            Ok(offer) => {
                state.write_error = None;
                state.mine.prepend(offer.clone());
                Ok(offer)
            }
            Err(err) => Err(write_failed(&mut state.write_error, "create offer", err)),
        }
    }

    pub async fn accept_offer(&self, id: &str, form: Option<&RespondToOfferForm>) -> Result<Offer, CommerceError> {
        let result = self.client.accept_offer(id, form).await;
        self.apply_response(result, "accept offer").await
    }

    pub async fn reject_offer(&self, id: &str, form: Option<&RespondToOfferForm>) -> Result<Offer, CommerceError> {
        let result = self.client.reject_offer(id, form).await;
        self.apply_response(result, "reject offer").await
    }

    async fn apply_response(&self, result: Result<Offer, CommerceError>, action: &str) -> Result<Offer, CommerceError> {
        let mut state = self.state.lock().await;
        match result {
            Ok(offer) => {
                state.write_error = None;
                state.mine.replace(&offer);
                state.incoming.replace(&offer);
                state.current.replace(&offer);
                Ok(offer)
            }
            Err(err) => Err(write_failed(&mut state.write_error, action, err)),
        }
    }
}
