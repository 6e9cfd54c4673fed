use axum::{
    extract::State,
    response::Html,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    routes::AppState,
    services::popularity::{render_popularity_html, DEFAULT_TOP_PRODUCTS},
};

/// Handler for the popularity page
pub async fn popularity_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let ranked = state.popularity.top_products(DEFAULT_TOP_PRODUCTS).await?;
    Ok(Html(format!(
        "<h2>Product Popularity</h2>{}",
        render_popularity_html(&ranked)
    )))
}

/// Handler for the popular-products HTML fragment
pub async fn popular_products_html(State(state): State<AppState>) -> AppResult<Html<String>> {
    let ranked = state.popularity.top_products(DEFAULT_TOP_PRODUCTS).await?;
    Ok(Html(render_popularity_html(&ranked)))
}

/// Handler for the popular-product id list, most visited first
pub async fn popular_product_ids(State(state): State<AppState>) -> AppResult<Json<Vec<i64>>> {
    let ids = state
        .popularity
        .top_product_ids(DEFAULT_TOP_PRODUCTS)
        .await?;
    if ids.is_empty() {
        return Err(AppError::NotFound(
            "No popular recommendations found".to_string(),
        ));
    }
    Ok(Json(ids))
}
