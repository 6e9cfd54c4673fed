use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::Store,
    error::AppResult,
    models::{CartItem, Product, ProductVisitCount, SearchEntry, User, Visit, WishlistItem},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// PostgreSQL-backed [`Store`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn all_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, brand, model, category, subcategory, \
             price, discount, quantity, created_at \
             FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn product(&self, product_id: i64) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, brand, model, category, subcategory, \
             price, discount, quantity, created_at \
             FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn user(&self, user_id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, last_name, email, phone, address, created_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn recent_visits(&self, user_id: i64, limit: usize) -> AppResult<Vec<Visit>> {
        let visits = sqlx::query_as::<_, Visit>(
            "SELECT id, user_id, product_id, visited_at \
             FROM product_visits WHERE user_id = $1 \
             ORDER BY visited_at DESC NULLS LAST LIMIT $2",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(visits)
    }

    async fn visits_for_user(&self, user_id: i64) -> AppResult<Vec<Visit>> {
        let visits = sqlx::query_as::<_, Visit>(
            "SELECT id, user_id, product_id, visited_at \
             FROM product_visits WHERE user_id = $1 \
             ORDER BY visited_at DESC NULLS LAST",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(visits)
    }

    async fn visit_counts(&self) -> AppResult<Vec<ProductVisitCount>> {
        let counts = sqlx::query_as::<_, ProductVisitCount>(
            "SELECT product_id, COUNT(*) AS visits \
             FROM product_visits GROUP BY product_id \
             ORDER BY visits DESC, product_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn search_history(&self, user_id: i64) -> AppResult<Vec<SearchEntry>> {
        let entries = sqlx::query_as::<_, SearchEntry>(
            "SELECT id, user_id, search_term, created_at \
             FROM search_history WHERE user_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn wishlist(&self, user_id: i64) -> AppResult<Vec<WishlistItem>> {
        let items = sqlx::query_as::<_, WishlistItem>(
            "SELECT id, user_id, product_id, created_at \
             FROM wishlist_items WHERE user_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn cart(&self, user_id: i64) -> AppResult<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(
            "SELECT id, user_id, product_id, quantity, created_at \
             FROM cart_items WHERE user_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
