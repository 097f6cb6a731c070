use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::{ApiError, ApiResult};
use crate::models::quote::{DetailQuery, HistoryQuery, HistoryResponse, Quote, QuoteDetail};
use crate::AppState;

const DEFAULT_DETAIL_PERIOD: &str = "7d";
const DEFAULT_HISTORY_PERIOD: &str = "30d";
const DEFAULT_HISTORY_INTERVAL: &str = "1d";

/// Handler for GET /api/crypto
///
/// Partial results are returned as 200; the 500 only fires when every
/// listed symbol errored upstream.
pub async fn list_quotes(State(state): State<AppState>) -> ApiResult<Json<Vec<Quote>>> {
    let quotes = state
        .quotes
        .list_quotes(state.list_limit)
        .await
        .map_err(|e| {
            tracing::error!("Error in list_quotes: {}", e);
            ApiError::Internal("Failed to fetch cryptocurrency data".to_string())
        })?;

    tracing::info!("Returning {} quotes", quotes.len());

    Ok(Json(quotes))
}

/// Handler for GET /api/crypto/{id}
pub async fn get_quote_detail(
    State(state): State<AppState>,
    Path(crypto_id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<Json<QuoteDetail>> {
    let period = query.period.as_deref().unwrap_or(DEFAULT_DETAIL_PERIOD);

    match state.quotes.quote_detail(&crypto_id, period).await {
        Ok(detail) => Ok(Json(detail)),
        Err(e) if e.is_not_found() => Err(ApiError::NotFound(
            "No data found for this cryptocurrency".to_string(),
        )),
        Err(e) => {
            tracing::error!("Error in get_quote_detail for {}: {}", crypto_id, e);
            Err(ApiError::Internal(format!("Failed to fetch data for {}", crypto_id)))
        }
    }
}

/// Handler for GET /api/crypto/{id}/history
pub async fn get_quote_history(
    State(state): State<AppState>,
    Path(crypto_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let period = query.period.as_deref().unwrap_or(DEFAULT_HISTORY_PERIOD);
    let interval = query.interval.as_deref().unwrap_or(DEFAULT_HISTORY_INTERVAL);

    match state.quotes.quote_history(&crypto_id, period, interval).await {
        Ok(history) => Ok(Json(history)),
        Err(e) if e.is_not_found() => {
            Err(ApiError::NotFound("No historical data found".to_string()))
        }
        Err(e) => {
            tracing::error!("Error in get_quote_history for {}: {}", crypto_id, e);
            Err(ApiError::Internal(format!(
                "Failed to fetch historical data for {}",
                crypto_id
            )))
        }
    }
}
