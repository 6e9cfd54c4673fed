//! Personalized, content-based product recommendations
//!
//! Ranks catalog products for a user by combining recency-weighted visit
//! history with TF-IDF/cosine similarity over product text. The pipeline:
//!
//! 1. Fetch the user's most recent visits (up to `max_records`).
//! 2. Weight each visit by recency: the newest gets 1.0, the oldest in
//!    the window gets 0.0; keep the `focus_records` heaviest as seeds.
//! 3. Vectorize the full catalog and score each seed's similarity row,
//!    scaled by its weight; take the top similar products per seed.
//! 4. Drop already-visited products, prioritize candidates sharing a
//!    seed category, order by newest catalog entry, cap at `max_records`.
//!
//! No visits or no catalog is an empty result, not an error. Store
//! failures propagate unchanged; there is no retry or partial result.

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    db::Store,
    error::AppResult,
    models::{Product, Visit},
    services::tfidf::TfidfModel,
};

/// Cap on visits fetched and on recommendations returned
pub const DEFAULT_MAX_RECORDS: usize = 16;

/// Cap on the highest-weighted visits used to seed similarity search
pub const DEFAULT_FOCUS_RECORDS: usize = 6;

/// Similar products taken per seed visit before filtering
const SIMILAR_PER_SEED: usize = 5;

/// A visit annotated with its recency weight in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedVisit {
    pub product_id: i64,
    pub weight: f64,
}

/// Assigns recency weights to a window of visits
///
/// Weight is `1 - age / max_age` over the window, so the newest visit
/// weighs 1.0 and the oldest 0.0. When every visit shares one timestamp
/// (`max_age == 0`) all weights are 1.0. Visits without a timestamp are
/// dropped; ages are clamped at zero so clock skew cannot push a weight
/// above 1.0.
pub fn apply_recency_weights(visits: &[Visit], now: DateTime<Utc>) -> Vec<WeightedVisit> {
    let aged: Vec<(i64, f64)> = visits
        .iter()
        .filter_map(|visit| {
            visit.visited_at.map(|at| {
                let age_secs = (now - at).num_milliseconds() as f64 / 1000.0;
                (visit.product_id, age_secs.max(0.0))
            })
        })
        .collect();

    let max_age = aged.iter().map(|&(_, age)| age).fold(0.0, f64::max);

    aged.into_iter()
        .map(|(product_id, age)| WeightedVisit {
            product_id,
            weight: if max_age > 0.0 { 1.0 - age / max_age } else { 1.0 },
        })
        .collect()
}

/// Keeps the `focus_records` highest-weighted visits, heaviest first
///
/// The sort is stable, so equally weighted visits keep their recency
/// order from the fetched window.
pub fn select_focus(mut weighted: Vec<WeightedVisit>, focus_records: usize) -> Vec<WeightedVisit> {
    weighted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    weighted.truncate(focus_records);
    weighted
}

/// Explicitly owned scoring state for one catalog snapshot
///
/// Holds the catalog rows, an id → row index, and the fitted TF-IDF
/// model. Built per call (or reused via [`Recommender`]'s fingerprint
/// cache); nothing lives in module state.
pub struct ScoringContext {
    products: Vec<Product>,
    index_by_id: HashMap<i64, usize>,
    model: TfidfModel,
}

impl ScoringContext {
    /// Vectorizes a catalog snapshot
    pub fn build(products: Vec<Product>) -> Self {
        let blobs: Vec<String> = products.iter().map(Product::feature_text).collect();
        let model = TfidfModel::fit(&blobs);

        // First occurrence wins if the snapshot carries duplicate ids
        let mut index_by_id = HashMap::with_capacity(products.len());
        for (index, product) in products.iter().enumerate() {
            index_by_id.entry(product.id).or_insert(index);
        }

        tracing::debug!(
            products = products.len(),
            terms = model.vocab_size(),
            "scoring context built"
        );

        Self {
            products,
            index_by_id,
            model,
        }
    }
}

/// Stable fingerprint of a catalog snapshot, used to reuse a
/// [`ScoringContext`] across calls until the catalog changes
pub fn catalog_fingerprint(products: &[Product]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    products.len().hash(&mut hasher);
    for product in products {
        product.id.hash(&mut hasher);
        product.created_at.timestamp_millis().hash(&mut hasher);
        product.feature_text().hash(&mut hasher);
    }
    hasher.finish()
}

/// Generates and ranks candidates for a set of weighted seed visits
///
/// Seeds are consumed heaviest first. Each seed contributes its
/// `SIMILAR_PER_SEED` most similar catalog products (similarity scaled
/// by the seed's weight, the seed itself excluded); seeds absent from
/// the catalog are skipped. Candidates are deduplicated keeping the
/// first occurrence, already-visited products are removed, and the rest
/// are ordered by category match (against the seeds' categories), then
/// newest `created_at`, then product id ascending.
pub fn rank_candidates(
    context: &ScoringContext,
    focus: &[WeightedVisit],
    visited_ids: &HashSet<i64>,
    max_records: usize,
) -> Vec<Product> {
    let mut candidate_indices: Vec<usize> = Vec::new();
    let mut focus_categories: HashSet<&str> = HashSet::new();

    for seed in focus {
        let Some(&seed_index) = context.index_by_id.get(&seed.product_id) else {
            continue;
        };
        if let Some(category) = context.products[seed_index].category.as_deref() {
            focus_categories.insert(category);
        }

        let mut scored: Vec<(usize, f64)> = context
            .model
            .similarity_row(seed_index)
            .into_iter()
            .map(|similarity| similarity * seed.weight)
            .enumerate()
            .collect();
        // Stable sort: equal scores keep catalog order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        candidate_indices.extend(
            scored
                .into_iter()
                .map(|(index, _)| index)
                .filter(|&index| index != seed_index)
                .take(SIMILAR_PER_SEED),
        );
    }

    // Deduplicate (first occurrence wins) and drop the visited window
    let mut seen: HashSet<i64> = HashSet::new();
    let mut picked: Vec<usize> = candidate_indices
        .into_iter()
        .filter(|&index| {
            let id = context.products[index].id;
            seen.insert(id) && !visited_ids.contains(&id)
        })
        .collect();

    let category_matches = |index: usize| {
        context.products[index]
            .category
            .as_deref()
            .is_some_and(|category| focus_categories.contains(category))
    };

    picked.sort_by(|&a, &b| {
        let product_a = &context.products[a];
        let product_b = &context.products[b];
        category_matches(b)
            .cmp(&category_matches(a))
            .then_with(|| product_b.created_at.cmp(&product_a.created_at))
            .then_with(|| product_a.id.cmp(&product_b.id))
    });
    picked.truncate(max_records);

    picked
        .into_iter()
        .map(|index| context.products[index].clone())
        .collect()
}

struct CachedContext {
    fingerprint: u64,
    context: Arc<ScoringContext>,
}

/// Content-based recommendation service
///
/// Owns the data-source handle and a scoring-context cache keyed by the
/// catalog fingerprint. The cache is a performance shortcut only: a
/// changed catalog produces a new fingerprint and a fresh context, so
/// output never depends on cache state.
pub struct Recommender {
    store: Arc<dyn Store>,
    cache: RwLock<Option<CachedContext>>,
}

impl Recommender {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            cache: RwLock::new(None),
        }
    }

    /// Ranked product recommendations for a user, default parameters
    pub async fn recommend(&self, user_id: i64) -> AppResult<Vec<Product>> {
        self.recommend_with(user_id, DEFAULT_MAX_RECORDS, DEFAULT_FOCUS_RECORDS, Utc::now())
            .await
    }

    /// Ranked recommendation ids for a user, same order as [`recommend`]
    ///
    /// [`recommend`]: Recommender::recommend
    pub async fn recommend_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        let products = self.recommend(user_id).await?;
        Ok(products.into_iter().map(|product| product.id).collect())
    }

    /// Full pipeline with explicit parameters and clock
    ///
    /// `now` is injectable so callers (and tests) can pin the weighting
    /// clock; two calls with identical history, catalog, and `now`
    /// return identical output.
    pub async fn recommend_with(
        &self,
        user_id: i64,
        max_records: usize,
        focus_records: usize,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Product>> {
        let visits = self.store.recent_visits(user_id, max_records).await?;
        if visits.is_empty() {
            tracing::debug!(user_id, "no visit history, skipping recommendations");
            return Ok(Vec::new());
        }

        let focus = select_focus(apply_recency_weights(&visits, now), focus_records);

        let products = self.store.all_products().await?;
        if products.is_empty() {
            tracing::debug!(user_id, "catalog is empty, skipping recommendations");
            return Ok(Vec::new());
        }

        let context = self.context_for(products).await;
        let visited_ids: HashSet<i64> = visits.iter().map(|visit| visit.product_id).collect();

        let ranked = rank_candidates(&context, &focus, &visited_ids, max_records);
        tracing::info!(
            user_id,
            visits = visits.len(),
            seeds = focus.len(),
            recommended = ranked.len(),
            "generated recommendations"
        );
        Ok(ranked)
    }

    /// Reuses the cached scoring context while the catalog fingerprint
    /// is unchanged, rebuilding it otherwise
    async fn context_for(&self, products: Vec<Product>) -> Arc<ScoringContext> {
        let fingerprint = catalog_fingerprint(&products);

        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.fingerprint == fingerprint {
                return cached.context.clone();
            }
        }

        let context = Arc::new(ScoringContext::build(products));
        *self.cache.write().await = Some(CachedContext {
            fingerprint,
            context: context.clone(),
        });
        context
    }
}

/// Renders a ranked recommendation list as an HTML fragment
///
/// Presentation only: iterates the list in ranked order and carries no
/// scoring logic. An empty list renders an explicit message.
pub fn render_recommendations_html(user_id: i64, products: &[Product]) -> String {
    if products.is_empty() {
        return "<h3>No recommendations found.</h3>".to_string();
    }

    let mut html = format!("<h2>Recommendations for user {user_id}</h2><ul>");
    for product in products {
        html.push_str("<li>");
        html.push_str(&format!("<strong>Name:</strong> {}<br>", product.name));
        html.push_str(&format!(
            "<strong>Description:</strong> {}<br>",
            product.description.as_deref().unwrap_or("")
        ));
        html.push_str(&format!("<strong>Price:</strong> ${}<br>", product.price));
        html.push_str(&format!(
            "<strong>Category:</strong> {}<br>",
            product.category.as_deref().unwrap_or("")
        ));
        html.push_str(&format!(
            "<strong>Subcategory:</strong> {}<br>",
            product.subcategory.as_deref().unwrap_or("")
        ));
        html.push_str(&format!(
            "<strong>Brand:</strong> {}<br>",
            product.brand.as_deref().unwrap_or("")
        ));
        html.push_str(&format!(
            "<strong>Model:</strong> {}<br>",
            product.model.as_deref().unwrap_or("")
        ));
        html.push_str(&format!("<strong>ID:</strong> {}<br>", product.id));
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}
