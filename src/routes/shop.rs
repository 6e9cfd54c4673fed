use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{CartItem, Product, SearchEntry, User, Visit, WishlistItem},
    routes::AppState,
};

/// Handler for a single user lookup
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<User>> {
    match state.store.user(user_id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}

/// Handler for a single product lookup
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<Product>> {
    match state.store.product(product_id).await? {
        Some(product) => Ok(Json(product)),
        None => Err(AppError::NotFound("Product not found".to_string())),
    }
}

/// Handler for a user's full visit history
pub async fn get_visited_products(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Visit>>> {
    let visits = state.store.visits_for_user(user_id).await?;
    if visits.is_empty() {
        return Err(AppError::NotFound("Product visit not found".to_string()));
    }
    Ok(Json(visits))
}

/// Handler for a user's search history
pub async fn get_search_history(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<SearchEntry>>> {
    let entries = state.store.search_history(user_id).await?;
    if entries.is_empty() {
        return Err(AppError::NotFound("Search history not found".to_string()));
    }
    Ok(Json(entries))
}

/// Handler for a user's wishlist
pub async fn get_wishlist(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<WishlistItem>>> {
    let items = state.store.wishlist(user_id).await?;
    if items.is_empty() {
        return Err(AppError::NotFound(
            "No wish list found for this user".to_string(),
        ));
    }
    Ok(Json(items))
}

/// Handler for a user's shopping cart
pub async fn get_shopping_cart(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<CartItem>>> {
    let items = state.store.cart(user_id).await?;
    if items.is_empty() {
        return Err(AppError::NotFound(
            "No shopping cart found for this user".to_string(),
        ));
    }
    Ok(Json(items))
}
