use axum::{
    extract::{Path, State},
    response::Html,
    Extension, Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    routes::AppState,
    services::recommendations::render_recommendations_html,
};

/// Handler for the recommendations HTML fragment
///
/// An empty ranking renders a "no recommendations found" message with a
/// success status; only store failures become errors.
pub async fn recommendations_page(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
) -> AppResult<Html<String>> {
    let products = state.recommender.recommend(user_id).await?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        recommended = products.len(),
        "serving recommendations page"
    );

    Ok(Html(render_recommendations_html(user_id, &products)))
}

/// Handler for the recommendation id list
///
/// Returns the ids in ranked order; an empty ranking maps to 404.
pub async fn recommended_ids(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<i64>>> {
    let ids = state.recommender.recommend_ids(user_id).await?;
    if ids.is_empty() {
        return Err(AppError::NotFound("No recommendations found".to_string()));
    }
    Ok(Json(ids))
}
