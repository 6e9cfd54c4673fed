use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product
///
/// Textual attributes are optional: a missing field contributes an empty
/// string to the vectorization blob instead of failing the scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: f64,
    pub discount: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Text blob used for TF-IDF vectorization
    ///
    /// Field order is fixed (brand, category, subcategory, model,
    /// description) so identical catalogs always vectorize identically.
    pub fn feature_text(&self) -> String {
        [
            self.brand.as_deref(),
            self.category.as_deref(),
            self.subcategory.as_deref(),
            self.model.as_deref(),
            self.description.as_deref(),
        ]
        .map(|field| field.unwrap_or(""))
        .join(" ")
    }
}

/// A single product visit by a user
///
/// `visited_at` is nullable: rows with no usable timestamp are dropped by
/// the recency weighting step rather than treated as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Visit {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub visited_at: Option<DateTime<Utc>>,
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One recorded search term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchEntry {
    pub id: i64,
    pub user_id: i64,
    pub search_term: String,
    pub created_at: DateTime<Utc>,
}

/// A wishlist row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WishlistItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A shopping cart row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Aggregated visit count for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductVisitCount {
    pub product_id: i64,
    pub visits: i64,
}
