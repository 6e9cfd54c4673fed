//! Popularity-based recommendations
//!
//! Ranks products by total visit count across all users. No
//! personalization: the same ranking is served to everyone.

use std::sync::Arc;

use crate::{db::Store, error::AppResult, models::Product};

/// Default number of top products returned
pub const DEFAULT_TOP_PRODUCTS: usize = 8;

/// A product together with its total visit count
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProduct {
    pub product: Product,
    pub visits: i64,
}

/// Popularity ranking service
pub struct PopularityRanker {
    store: Arc<dyn Store>,
}

impl PopularityRanker {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Ids of the `limit` most visited products, most visited first
    pub async fn top_product_ids(&self, limit: usize) -> AppResult<Vec<i64>> {
        let counts = self.store.visit_counts().await?;
        Ok(counts
            .into_iter()
            .take(limit)
            .map(|count| count.product_id)
            .collect())
    }

    /// The `limit` most visited products with their counts
    ///
    /// Counted ids whose product no longer exists in the catalog are
    /// skipped, so fewer than `limit` rows may come back.
    pub async fn top_products(&self, limit: usize) -> AppResult<Vec<RankedProduct>> {
        let counts = self.store.visit_counts().await?;

        let mut ranked = Vec::new();
        for count in counts.into_iter().take(limit) {
            if let Some(product) = self.store.product(count.product_id).await? {
                ranked.push(RankedProduct {
                    product,
                    visits: count.visits,
                });
            }
        }

        tracing::debug!(products = ranked.len(), "popularity ranking computed");
        Ok(ranked)
    }
}

/// Renders the top-products list as an HTML fragment
pub fn render_popularity_html(ranked: &[RankedProduct]) -> String {
    if ranked.is_empty() {
        return "<h3>No popular products found.</h3>".to_string();
    }

    let mut html = format!("<h3>Top {} Most Popular Products</h3>", ranked.len());
    for entry in ranked {
        html.push_str("<div>");
        html.push_str(&format!("<h4>{}</h4>", entry.product.name));
        html.push_str(&format!(
            "<p>{}</p>",
            entry.product.description.as_deref().unwrap_or("")
        ));
        html.push_str(&format!("<p>Price: ${}</p>", entry.product.price));
        html.push_str(&format!("<p>Visits: {}</p>", entry.visits));
        html.push_str(&format!("<p>Product ID: {}</p>", entry.product.id));
        html.push_str("</div>");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::Visit;
    use chrono::{TimeZone, Utc};

    fn product(id: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: None,
            brand: None,
            model: None,
            category: None,
            subcategory: None,
            price: 10.0,
            discount: 0.0,
            quantity: 1,
            created_at: Utc.timestamp_opt(1_000, 0).unwrap(),
        }
    }

    async fn store_with_visits(visits: &[(i64, i64)]) -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        for &(id, product_id) in visits {
            store
                .add_visit(Visit {
                    id,
                    user_id: id,
                    product_id,
                    visited_at: Some(Utc.timestamp_opt(id * 10, 0).unwrap()),
                })
                .await;
        }
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_top_ids_ranked_by_visit_count() {
        let store =
            store_with_visits(&[(1, 5), (2, 5), (3, 5), (4, 9), (5, 9), (6, 2)]).await;
        let ranker = PopularityRanker::new(store);

        let ids = ranker.top_product_ids(8).await.unwrap();
        assert_eq!(ids, vec![5, 9, 2]);
    }

    #[tokio::test]
    async fn test_top_ids_respects_limit() {
        let store = store_with_visits(&[(1, 1), (2, 2), (3, 3)]).await;
        let ranker = PopularityRanker::new(store);

        let ids = ranker.top_product_ids(2).await.unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_top_products_skips_missing_catalog_rows() {
        let store = store_with_visits(&[(1, 5), (2, 5), (3, 7)]).await;
        store.add_product(product(5)).await;
        // Product 7 was visited but is gone from the catalog
        let ranker = PopularityRanker::new(store);

        let ranked = ranker.top_products(8).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].product.id, 5);
        assert_eq!(ranked[0].visits, 2);
    }

    #[tokio::test]
    async fn test_no_visits_yields_empty_ranking() {
        let store = store_with_visits(&[]).await;
        let ranker = PopularityRanker::new(store);

        assert!(ranker.top_product_ids(8).await.unwrap().is_empty());
        assert!(ranker.top_products(8).await.unwrap().is_empty());
    }

    #[test]
    fn test_html_rendering() {
        assert_eq!(
            render_popularity_html(&[]),
            "<h3>No popular products found.</h3>"
        );

        let ranked = vec![RankedProduct {
            product: product(5),
            visits: 3,
        }];
        let html = render_popularity_html(&ranked);
        assert!(html.contains("Product 5"));
        assert!(html.contains("Visits: 3"));
    }
}
