//! Route definitions for the storefront proxy

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app_state::AppState;
use crate::handlers::{self, listings, resources, stores};

// Store routes
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/api/commerce/stores", get(stores::list_stores).post(stores::create_store))
        .route("/api/commerce/stores/:id", get(stores::get_store))
        .route("/api/commerce/stores/:id/policies", patch(stores::update_store_policies))
}

// Listing routes
pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/commerce/listings",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route("/api/commerce/listings/:id", get(listings::get_listing))
        .route("/api/commerce/listings/:id/price", patch(listings::update_listing_price))
        .route(
            "/api/commerce/listings/:id/review-thread",
            get(listings::get_listing_review_thread),
        )
}

// Product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/commerce/products", post(resources::create_product))
        .route("/api/commerce/products/:id", get(resources::get_product))
        .route(
            "/api/commerce/products/:id/regenerate-image",
            post(resources::regenerate_product_image),
        )
}

// Offer routes
pub fn offer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/commerce/offers", post(resources::create_offer))
        .route("/api/commerce/offers/mine", get(resources::my_offers))
        .route("/api/commerce/offers/store/:store_id", get(resources::store_offers))
        .route("/api/commerce/offers/:id", get(resources::get_offer))
        .route("/api/commerce/offers/:id/accept", post(resources::accept_offer))
        .route("/api/commerce/offers/:id/reject", post(resources::reject_offer))
}

// Order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/api/commerce/orders/direct", post(resources::purchase_direct))
        .route("/api/commerce/orders/from-offer", post(resources::purchase_from_offer))
        .route("/api/commerce/orders/mine", get(resources::my_orders))
        .route("/api/commerce/orders/:id", get(resources::get_order))
}

// Review and trust routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/api/commerce/reviews", post(resources::create_review))
        .route("/api/commerce/reviews/order/:order_id", get(resources::order_review))
        .route("/api/commerce/reviews/listing/:listing_id", get(resources::listing_reviews))
        .route("/api/commerce/trust/store/:store_id", get(resources::store_trust))
        .route(
            "/api/commerce/trust/store/:store_id/events",
            get(resources::store_trust_events),
        )
}

// Activity, leaderboard and looking-for routes
pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/api/commerce/activity", get(resources::activity))
        .route("/api/commerce/leaderboard", get(resources::leaderboard))
        .route(
            "/api/commerce/looking-for",
            get(resources::looking_for).post(resources::create_looking_for),
        )
}

/// Full application router with CORS and request tracing.
pub fn app(state: AppState, cors_allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .merge(store_routes())
        .merge(listing_routes())
        .merge(product_routes())
        .merge(offer_routes())
        .merge(order_routes())
        .merge(review_routes())
        .merge(feed_routes())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_allowed_origins))
        .with_state(state)
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins = origins
        .iter()
        .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
}
