use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One OHLCV sample as reported by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Issuer metadata. Every field is optional on the wire; Yahoo's chart
/// endpoint never supplies `market_cap`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerInfo {
    pub long_name: Option<String>,
    pub market_cap: Option<u64>,
    pub volume_24h: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no data found for {0}")]
    NotFound(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

/// Metadata and candles from a single provider response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    pub info: TickerInfo,
    pub candles: Vec<Candle>,
}

/// Source of prices and metadata, keyed by ticker symbol
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// One request: issuer metadata plus candles over `period` sampled at
    /// `interval`, oldest first. Empty candles mean the provider knows the
    /// symbol but has no rows.
    async fn chart(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Chart, ProviderError>;
}
