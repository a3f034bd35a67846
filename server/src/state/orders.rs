use tokio::sync::Mutex;

use super::list::{load_page, write_failed, DetailSlot, ListState, LoadOutcome, PageRequest};
use crate::client::{CommerceClient, OrderQuery};
use crate::error::CommerceError;
use crate::models::{CreateReviewForm, Order, PurchaseDirectForm, PurchaseFromOfferForm, Review};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBookState {
    pub orders: ListState<Order>,
    pub current: DetailSlot<Order>,
    pub is_purchasing: bool,
    pub is_reviewing: bool,
    pub write_error: Option<String>,
}

fn orders(state: &mut OrderBookState) -> &mut ListState<Order> {
    &mut state.orders
}

pub struct OrderBook {
    client: CommerceClient,
    state: Mutex<OrderBookState>,
}

impl OrderBook {
    pub fn new(client: CommerceClient) -> Self {
        Self {
            client,
            state: Mutex::new(OrderBookState::default()),
        }
    }

    pub async fn snapshot(&self) -> OrderBookState {
        self.state.lock().await.clone()
    }

    pub async fn load_orders(&self, reset: bool) -> LoadOutcome {
        self.fetch_page(PageRequest::from_reset(reset)).await
    }

    pub async fn load_more(&self) -> LoadOutcome {
        self.fetch_page(PageRequest::More).await
    }

    async fn fetch_page(&self, request: PageRequest) -> LoadOutcome {
        let client = &self.client;
        load_page(&self.state, orders, request, |_| (), |offset, ()| async move {
            let query = OrderQuery {
                offset: Some(offset),
                ..Default::default()
            };
            let page = client.get_my_orders(&query).await?;
            Ok::<_, CommerceError>((page.data, page.pagination.has_more))
        })
        .await
    }

    pub async fn load_order(&self, id: &str) -> LoadOutcome {
        let ticket = self.state.lock().await.current.begin();
        let result = self.client.get_order(id).await;
        self.state.lock().await.current.settle(ticket, result)
    }

    pub async fn set_current(&self, order: Option<Order>) {
        self.state.lock().await.current.set(order);
    }

    pub async fn purchase_direct(&self, listing_id: &str) -> Result<Order, CommerceError> {
        self.state.lock().await.is_purchasing = true;
        let form = PurchaseDirectForm {
            listing_id: listing_id.to_string(),
        };
        let result = self.client.purchase_direct(&form).await;
        self.record_purchase(result, "purchase listing").await
    }

    pub async fn purchase_from_offer(&self, offer_id: &str) -> Result<Order, CommerceError> {
        self.state.lock().await.is_purchasing = true;
        let form = PurchaseFromOfferForm {
            offer_id: offer_id.to_string(),
        };
        let result = self.client.purchase_from_offer(&form).await;
        self.record_purchase(result, "purchase from offer").await
    }

    async fn record_purchase(&self, result: Result<Order, CommerceError>, action: &str) -> Result<Order, CommerceError> {
        let mut state = self.state.lock().await;
        state.is_purchasing = false;
        match result {
            Ok(order) => {
                state.write_error = None;
                state.orders.prepend(order.clone());
                Ok(order)
            }
            Err(err) => Err(write_failed(&mut state.write_error, action, err)),
        }
    }

    pub async fn submit_review(&self, order_id: &str, form: &CreateReviewForm) -> Result<Review, CommerceError> {
        self.state.lock().await.is_reviewing = true;
        let result = self.client.create_review(order_id, form).await;
        let mut state = self.state.lock().await;
        state.is_reviewing = false;
        match result {
            Ok(review) => {
                state.write_error = None;
                Ok(review)
            }
            Err(err) => Err(write_failed(&mut state.write_error, "submit review", err)),
        }
    }
}
