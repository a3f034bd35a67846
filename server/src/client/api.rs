use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use validator::Validate;

use super::query::{ListingQuery, OfferQuery, OrderQuery, PageParams};
use super::transport::{ApiRequest, HttpTransport, Transport};
use crate::config::ClientConfig;
use crate::error::CommerceError;
use crate::models::{
    ActivityEvent, CreateListingForm, CreateLookingForForm, CreateOfferForm, CreateProductForm,
    CreateReviewForm, CreateStoreForm, LeaderboardEntry, Listing, LookingForItem, Offer, Order,
    Page, Product, PurchaseDirectForm, PurchaseFromOfferForm, RespondToOfferForm, Review, Store,
    TrustEvent, TrustProfile, UpdateListingPriceForm, UpdateStorePoliciesForm,
};

const BASE: &str = "/api/commerce";

const STORES_PAGE: u32 = 50;
const LISTINGS_PAGE: u32 = 25;
const OFFERS_PAGE: u32 = 50;
const ORDERS_PAGE: u32 = 50;
const REVIEWS_PAGE: u32 = 25;
const TRUST_EVENTS_PAGE: u32 = 50;
const ACTIVITY_PAGE: u32 = 50;
const LOOKING_FOR_PAGE: u32 = 50;
const LEADERBOARD_SIZE: u32 = 10;

/// Typed commerce API over a [`Transport`].
#[derive(Clone)]
pub struct CommerceClient {
    transport: Arc<dyn Transport>,
}

impl CommerceClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(Arc::new(HttpTransport::new(config)))
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, CommerceError> {
        let body = self.transport.send(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Calls and unwraps a single-key envelope such as `{"store": {...}}`.
    async fn call_field<T: DeserializeOwned>(&self, request: ApiRequest, field: &str) -> Result<T, CommerceError> {
        let mut body = self.transport.send(request).await?;
        let inner = body.get_mut(field).map(Value::take).unwrap_or(Value::Null);
        Ok(serde_json::from_value(inner)?)
    }

    fn paged(path: String, params: PageParams, default_limit: u32) -> ApiRequest {
        ApiRequest::get(path)
            .query("limit", Some(params.limit.unwrap_or(default_limit)))
            .query("offset", Some(params.offset.unwrap_or(0)))
    }

    // ===== Stores =====

    pub async fn get_stores(&self, params: PageParams) -> Result<Page<Store>, CommerceError> {
        self.call(Self::paged(format!("{BASE}/stores"), params, STORES_PAGE))
            .await
    }

    pub async fn get_store(&self, id: &str) -> Result<Store, CommerceError> {
        self.call_field(ApiRequest::get(format!("{BASE}/stores/{id}")), "store")
            .await
    }

    pub async fn create_store(&self, form: &CreateStoreForm) -> Result<Store, CommerceError> {
        form.validate()?;
        let request = ApiRequest::post(format!("{BASE}/stores")).body(serde_json::to_value(form)?);
        self.call_field(request, "store").await
    }

    pub async fn update_store_policies(&self, id: &str, form: &UpdateStorePoliciesForm) -> Result<Store, CommerceError> {
        form.validate()?;
        let request = ApiRequest::patch(format!("{BASE}/stores/{id}/policies")).body(serde_json::to_value(form)?);
        self.call_field(request, "store").await
    }

    // ===== Products =====

    pub async fn get_product(&self, id: &str) -> Result<Product, CommerceError> {
        self.call_field(ApiRequest::get(format!("{BASE}/products/{id}")), "product")
            .await
    }

    pub async fn create_product(&self, store_id: &str, form: &CreateProductForm) -> Result<Product, CommerceError> {
        form.validate()?;
        let request = ApiRequest::post(format!("{BASE}/products")).body(with_parent(form, "storeId", store_id)?);
        self.call_field(request, "product").await
    }

    pub async fn regenerate_product_image(&self, product_id: &str) -> Result<Product, CommerceError> {
        let request = ApiRequest::post(format!("{BASE}/products/{product_id}/regenerate-image"));
        self.call_field(request, "product").await
    }

    // ===== Listings =====

    pub async fn get_listings(&self, query: &ListingQuery) -> Result<Page<Listing>, CommerceError> {
        let request = ApiRequest::get(format!("{BASE}/listings"))
            .query("store_id", query.store_id.as_deref())
            .query("status", query.status.map(|s| s.as_str()))
            .query("limit", Some(query.limit.unwrap_or(LISTINGS_PAGE)))
            .query("offset", Some(query.offset.unwrap_or(0)));
        self.call(request).await
    }

    pub async fn get_listing(&self, id: &str) -> Result<Listing, CommerceError> {
        self.call_field(ApiRequest::get(format!("{BASE}/listings/{id}")), "listing")
            .await
    }

    pub async fn create_listing(&self, store_id: &str, form: &CreateListingForm) -> Result<Listing, CommerceError> {
        form.validate()?;
        let request = ApiRequest::post(format!("{BASE}/listings")).body(with_parent(form, "storeId", store_id)?);
        self.call_field(request, "listing").await
    }

    pub async fn update_listing_price(&self, id: &str, form: &UpdateListingPriceForm) -> Result<Listing, CommerceError> {
        form.validate()?;
        let request = ApiRequest::patch(format!("{BASE}/listings/{id}/price")).body(serde_json::to_value(form)?);
        self.call_field(request, "listing").await
    }

    pub async fn get_listing_review_thread(&self, listing_id: &str) -> Result<Vec<Review>, CommerceError> {
        let request = ApiRequest::get(format!("{BASE}/listings/{listing_id}/review-thread"));
        self.call_field(request, "reviews").await
    }

    // ===== Offers =====

    pub async fn create_offer(&self, listing_id: &str, form: &CreateOfferForm) -> Result<Offer, CommerceError> {
        form.validate()?;
        let request = ApiRequest::post(format!("{BASE}/offers")).body(with_parent(form, "listingId", listing_id)?);
        self.call_field(request, "offer").await
    }

    pub async fn get_my_offers(&self, query: &OfferQuery) -> Result<Page<Offer>, CommerceError> {
        let request = ApiRequest::get(format!("{BASE}/offers/mine"))
            .query("status", query.status.map(|s| s.as_str()))
            .query("limit", Some(query.limit.unwrap_or(OFFERS_PAGE)))
            .query("offset", Some(query.offset.unwrap_or(0)));
        self.call(request).await
    }

    pub async fn get_store_offers(&self, store_id: &str, query: &OfferQuery) -> Result<Page<Offer>, CommerceError> {
        let request = ApiRequest::get(format!("{BASE}/offers/store/{store_id}"))
            .query("status", query.status.map(|s| s.as_str()))
            .query("limit", Some(query.limit.unwrap_or(OFFERS_PAGE)))
            .query("offset", Some(query.offset.unwrap_or(0)));
        self.call(request).await
    }

    pub async fn get_offer(&self, id: &str) -> Result<Offer, CommerceError> {
        self.call_field(ApiRequest::get(format!("{BASE}/offers/{id}")), "offer")
            .await
    }

    pub async fn accept_offer(&self, id: &str, form: Option<&RespondToOfferForm>) -> Result<Offer, CommerceError> {
        self.respond_to_offer(id, "accept", form).await
    }

    pub async fn reject_offer(&self, id: &str, form: Option<&RespondToOfferForm>) -> Result<Offer, CommerceError> {
        self.respond_to_offer(id, "reject", form).await
    }

    async fn respond_to_offer(&self, id: &str, action: &str, form: Option<&RespondToOfferForm>) -> Result<Offer, CommerceError> {
        let mut request = ApiRequest::post(format!("{BASE}/offers/{id}/{action}"));
        if let Some(form) = form {
            form.validate()?;
            request = request.body(serde_json::to_value(form)?);
        }
        self.call_field(request, "offer").await
    }

    // ===== Orders =====

    pub async fn purchase_direct(&self, form: &PurchaseDirectForm) -> Result<Order, CommerceError> {
        form.validate()?;
        let request = ApiRequest::post(format!("{BASE}/orders/direct")).body(serde_json::to_value(form)?);
        self.call_field(request, "order").await
    }

    pub async fn purchase_from_offer(&self, form: &PurchaseFromOfferForm) -> Result<Order, CommerceError> {
        form.validate()?;
        let request = ApiRequest::post(format!("{BASE}/orders/from-offer")).body(serde_json::to_value(form)?);
        self.call_field(request, "order").await
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, CommerceError> {
        self.call_field(ApiRequest::get(format!("{BASE}/orders/{id}")), "order")
            .await
    }

    pub async fn get_my_orders(&self, query: &OrderQuery) -> Result<Page<Order>, CommerceError> {
        let request = ApiRequest::get(format!("{BASE}/orders/mine"))
            .query("status", query.status.map(|s| s.as_str()))
            .query("limit", Some(query.limit.unwrap_or(ORDERS_PAGE)))
            .query("offset", Some(query.offset.unwrap_or(0)));
        self.call(request).await
    }

    // ===== Reviews =====

    pub async fn create_review(&self, order_id: &str, form: &CreateReviewForm) -> Result<Review, CommerceError> {
        form.validate()?;
        let request = ApiRequest::post(format!("{BASE}/reviews")).body(with_parent(form, "orderId", order_id)?);
        self.call_field(request, "review").await
    }

    /// `None` when the order has not been reviewed yet.
    pub async fn get_order_review(&self, order_id: &str) -> Result<Option<Review>, CommerceError> {
        self.call_field(ApiRequest::get(format!("{BASE}/reviews/order/{order_id}")), "review")
            .await
    }

    pub async fn get_listing_reviews(&self, listing_id: &str, params: PageParams) -> Result<Page<Review>, CommerceError> {
        self.call(Self::paged(format!("{BASE}/reviews/listing/{listing_id}"), params, REVIEWS_PAGE))
            .await
    }

    // ===== Trust =====

    pub async fn get_store_trust(&self, store_id: &str) -> Result<TrustProfile, CommerceError> {
        self.call_field(ApiRequest::get(format!("{BASE}/trust/store/{store_id}")), "trust")
            .await
    }

    pub async fn get_store_trust_events(&self, store_id: &str, params: PageParams) -> Result<Page<TrustEvent>, CommerceError> {
        self.call(Self::paged(format!("{BASE}/trust/store/{store_id}/events"), params, TRUST_EVENTS_PAGE))
            .await
    }

    // ===== Activity, leaderboard, looking-for =====

    pub async fn get_activity(&self, params: PageParams) -> Result<Page<ActivityEvent>, CommerceError> {
        self.call(Self::paged(format!("{BASE}/activity"), params, ACTIVITY_PAGE))
            .await
    }

    pub async fn get_leaderboard(&self, limit: Option<u32>) -> Result<Vec<LeaderboardEntry>, CommerceError> {
        let request = ApiRequest::get(format!("{BASE}/leaderboard")).query("limit", Some(limit.unwrap_or(LEADERBOARD_SIZE)));
        self.call_field(request, "entries").await
    }

    pub async fn get_looking_for(&self, params: PageParams) -> Result<Page<LookingForItem>, CommerceError> {
        self.call(Self::paged(format!("{BASE}/looking-for"), params, LOOKING_FOR_PAGE))
            .await
    }

    pub async fn create_looking_for(&self, form: &CreateLookingForForm) -> Result<LookingForItem, CommerceError> {
        form.validate()?;
        let request = ApiRequest::post(format!("{BASE}/looking-for")).body(serde_json::to_value(form)?);
        self.call_field(request, "item").await
    }
}

/// Serializes `form` and adds the parent resource id alongside its fields.
fn with_parent<F: Serialize>(form: &F, key: &str, id: &str) -> Result<Value, CommerceError> {
    let mut body = serde_json::to_value(form)?;
    if let Value::Object(fields) = &mut body {
        fields.insert(key.to_string(), Value::String(id.to_string()));
    }
    Ok(body)
}
