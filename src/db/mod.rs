//! Data source abstraction
//!
//! Every read the service performs goes through the `Store` trait so the
//! HTTP layer and the ranking services stay independent of the backing
//! engine. `PgStore` is the production implementation; `MemoryStore`
//! backs tests and local runs without a database.

use crate::{
    error::AppResult,
    models::{CartItem, Product, ProductVisitCount, SearchEntry, User, Visit, WishlistItem},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PgStore};

/// Read-only access to catalog, visit history, and user profile data
///
/// The scorer consumes the catalog methods (full product set, one call per
/// scoring request) and the visit methods (recency-ordered, limited). The
/// remaining methods serve the plain REST endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// All catalog products, in stable catalog order
    async fn all_products(&self) -> AppResult<Vec<Product>>;

    /// One product by id
    async fn product(&self, product_id: i64) -> AppResult<Option<Product>>;

    /// One user by id
    async fn user(&self, user_id: i64) -> AppResult<Option<User>>;

    /// Up to `limit` of the user's most recent visits, newest first
    async fn recent_visits(&self, user_id: i64, limit: usize) -> AppResult<Vec<Visit>>;

    /// Every visit recorded for the user
    async fn visits_for_user(&self, user_id: i64) -> AppResult<Vec<Visit>>;

    /// Visit counts per product across all users, most visited first
    ///
    /// Ties break by product id ascending so the ranking is stable.
    async fn visit_counts(&self) -> AppResult<Vec<ProductVisitCount>>;

    /// The user's recorded search terms
    async fn search_history(&self, user_id: i64) -> AppResult<Vec<SearchEntry>>;

    /// The user's wishlist rows
    async fn wishlist(&self, user_id: i64) -> AppResult<Vec<WishlistItem>>;

    /// The user's shopping cart rows
    async fn cart(&self, user_id: i64) -> AppResult<Vec<CartItem>>;
}
