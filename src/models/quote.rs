use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of one ticker.
///
/// `market_cap` is `0` when backed by Yahoo's chart endpoint, which does not
/// report it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub price_change_24h: f64,
    pub price_change_percentage_24h: f64,
    pub market_cap: u64,
    pub volume: u64,
    pub last_updated: DateTime<Utc>,
}

/// Quote plus window statistics.
///
/// `high_52w` / `low_52w` are taken over whatever window `period` selected,
/// not over 52 weeks. The names are kept for client compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,
    pub high_24h: f64,
    pub low_24h: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub average_volume: u64,
    pub historical_data: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub symbol: String,
    pub period: String,
    pub interval: String,
    pub data: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailQuery {
    pub period: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub period: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}
