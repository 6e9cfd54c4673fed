use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Store,
    middleware::request_id::{http_span, propagate_request_id},
    services::{PopularityRanker, Recommender},
};

pub mod popularity;
pub mod recommendations;
pub mod shop;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub recommender: Arc<Recommender>,
    pub popularity: Arc<PopularityRanker>,
}

impl AppState {
    /// Wires the ranking services onto one data source
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            recommender: Arc::new(Recommender::new(store.clone())),
            popularity: Arc::new(PopularityRanker::new(store.clone())),
            store,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Entity reads
        .route("/user/:user_id", get(shop::get_user))
        .route("/product/:product_id", get(shop::get_product))
        .route("/product_visited/:user_id", get(shop::get_visited_products))
        .route("/search_history/:user_id", get(shop::get_search_history))
        .route("/wishlist/:user_id", get(shop::get_wishlist))
        .route("/shoppingcart/:user_id", get(shop::get_shopping_cart))
        // Content-based recommendations
        .route(
            "/recommendations/:user_id",
            get(recommendations::recommendations_page),
        )
        .route(
            "/recommendations_ids/:user_id",
            get(recommendations::recommended_ids),
        )
        // Popularity recommendations
        .route("/popularity", get(popularity::popularity_page))
        .route(
            "/recommendations_popularity_html",
            get(popularity::popular_products_html),
        )
        .route(
            "/recommendations_popularity_ids",
            get(popularity::popular_product_ids),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(http_span))
        .layer(axum::middleware::from_fn(propagate_request_id))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
