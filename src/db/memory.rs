use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::Store,
    error::AppResult,
    models::{CartItem, Product, ProductVisitCount, SearchEntry, User, Visit, WishlistItem},
};

/// In-memory [`Store`] for tests and local runs without a database
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    products: Vec<Product>,
    visits: Vec<Visit>,
    searches: Vec<SearchEntry>,
    wishlist: Vec<WishlistItem>,
    cart: Vec<CartItem>,
}

impl MemoryStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.inner.write().await.users.push(user);
    }

    pub async fn add_product(&self, product: Product) {
        self.inner.write().await.products.push(product);
    }

    pub async fn add_visit(&self, visit: Visit) {
        self.inner.write().await.visits.push(visit);
    }

    pub async fn add_search(&self, entry: SearchEntry) {
        self.inner.write().await.searches.push(entry);
    }

    pub async fn add_wishlist_item(&self, item: WishlistItem) {
        self.inner.write().await.wishlist.push(item);
    }

    pub async fn add_cart_item(&self, item: CartItem) {
        self.inner.write().await.cart.push(item);
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn all_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.inner.read().await.products.clone())
    }

    async fn product(&self, product_id: i64) -> AppResult<Option<Product>> {
        let inner = self.inner.read().await;
        Ok(inner.products.iter().find(|p| p.id == product_id).cloned())
    }

    async fn user(&self, user_id: i64) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn recent_visits(&self, user_id: i64, limit: usize) -> AppResult<Vec<Visit>> {
        let mut visits = self.visits_for_user(user_id).await?;
        visits.truncate(limit);
        Ok(visits)
    }

    async fn visits_for_user(&self, user_id: i64) -> AppResult<Vec<Visit>> {
        let inner = self.inner.read().await;
        let mut visits: Vec<Visit> = inner
            .visits
            .iter()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        // Newest first; rows without a timestamp sort last
        visits.sort_by(|a, b| b.visited_at.cmp(&a.visited_at));
        Ok(visits)
    }

    async fn visit_counts(&self) -> AppResult<Vec<ProductVisitCount>> {
        let inner = self.inner.read().await;
        let mut counts: std::collections::HashMap<i64, i64> = std::collections::HashMap::new();
        for visit in &inner.visits {
            *counts.entry(visit.product_id).or_insert(0) += 1;
        }
        let mut ranked: Vec<ProductVisitCount> = counts
            .into_iter()
            .map(|(product_id, visits)| ProductVisitCount { product_id, visits })
            .collect();
        ranked.sort_by(|a, b| b.visits.cmp(&a.visits).then(a.product_id.cmp(&b.product_id)));
        Ok(ranked)
    }

    async fn search_history(&self, user_id: i64) -> AppResult<Vec<SearchEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .searches
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn wishlist(&self, user_id: i64) -> AppResult<Vec<WishlistItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .wishlist
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn cart(&self, user_id: i64) -> AppResult<Vec<CartItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .cart
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }
}
