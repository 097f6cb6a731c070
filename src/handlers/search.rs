use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::{ApiError, ApiResult};
use crate::models::quote::{SearchQuery, SearchResult};
use crate::AppState;

/// Handler for GET /api/search?q=...
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<SearchResult>>> {
    let q = query.q.unwrap_or_default().to_lowercase();
    if q.is_empty() {
        return Err(ApiError::BadRequest("Search query is required".to_string()));
    }

    let results = state.quotes.search(&q).await;
    tracing::info!("Search '{}' matched {} results", q, results.len());

    Ok(Json(results))
}
