use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use chrono::{TimeZone, Utc};
use quote_gateway::{
    routes::app_router,
    services::{
        provider::{Candle, Chart, MarketDataProvider, ProviderError, TickerInfo},
        quotes::QuoteService,
    },
    AppState,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

/// What the mock provider answers for a ticker
#[allow(dead_code)]
pub enum MockTicker {
    Rows(Vec<Candle>),
    Fail,
    Panic,
}

/// In-memory provider. Unknown tickers are reported as not found.
#[derive(Default)]
pub struct MockProvider {
    tickers: HashMap<String, MockTicker>,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn with(mut self, symbol: &str, ticker: MockTicker) -> Self {
        self.tickers.insert(symbol.to_string(), ticker);
        self
    }

    pub fn with_rows(self, symbol: &str, rows: Vec<Candle>) -> Self {
        self.with(symbol, MockTicker::Rows(rows))
    }

    fn lookup(&self, symbol: &str) -> Result<&Vec<Candle>, ProviderError> {
        match self.tickers.get(symbol) {
            Some(MockTicker::Rows(rows)) => Ok(rows),
            Some(MockTicker::Fail) => Err(ProviderError::Status {
                status: 503,
                body: "upstream unavailable".to_string(),
            }),
            Some(MockTicker::Panic) => panic!("provider exploded for {}", symbol),
            None => Err(ProviderError::NotFound(symbol.to_string())),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn chart(
        &self,
        symbol: &str,
        _period: &str,
        _interval: &str,
    ) -> Result<Chart, ProviderError> {
        let rows = self.lookup(symbol)?;
        Ok(Chart {
            info: TickerInfo {
                long_name: Some(format!("{} Long Name", symbol)),
                market_cap: Some(5_000_000),
                volume_24h: None,
            },
            candles: rows.clone(),
        })
    }
}

#[allow(dead_code)]
pub fn candle(day: u32, open: f64, close: f64, volume: u64) -> Candle {
    Candle {
        timestamp: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
        open,
        high: open.max(close) + 1.0,
        low: open.min(close) - 1.0,
        close,
        volume,
    }
}

#[allow(dead_code)]
pub fn sample_rows() -> Vec<Candle> {
    vec![
        candle(1, 100.0, 102.0, 500),
        candle(2, 102.0, 99.5, 700),
        candle(3, 99.5, 110.0, 900),
    ]
}

pub fn build_test_router(provider: MockProvider) -> Router {
    let state = AppState {
        quotes: QuoteService::new(Arc::new(provider), 4),
        list_limit: 10,
        service_name: "crypto-data-api".to_string(),
    };

    app_router(state)
}

/// Send a GET and return status plus decoded JSON body
pub async fn get_json(app: Router, uri: &str) -> (axum::http::StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    (status, json)
}
