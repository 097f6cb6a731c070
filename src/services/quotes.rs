use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;

use crate::models::quote::{HistoryPoint, HistoryResponse, Quote, QuoteDetail, SearchResult};
use crate::services::price_utils::{mean_volume, price_change, round_percent, round_price};
use crate::services::provider::{Candle, Chart, MarketDataProvider, ProviderError, TickerInfo};
use crate::services::symbols::{base_symbol, resolve_symbol, search_symbols, top_symbols};

/// Period/interval used for the one-day snapshot behind list and search
const SNAPSHOT_PERIOD: &str = "1d";
const SNAPSHOT_INTERVAL: &str = "1d";

/// Fetches from the market data provider and reshapes into response DTOs.
/// Holds no per-request state.
#[derive(Clone)]
pub struct QuoteService {
    provider: Arc<dyn MarketDataProvider>,
    fetch_concurrency: usize,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, fetch_concurrency: usize) -> Self {
        Self {
            provider,
            fetch_concurrency: fetch_concurrency.max(1),
        }
    }

    /// Quotes for the first `limit` table entries, in table order.
    ///
    /// Symbols without data are skipped; failing symbols are logged and
    /// skipped. Errors only when nothing was produced and at least one
    /// symbol failed.
    pub async fn list_quotes(&self, limit: usize) -> Result<Vec<Quote>, ProviderError> {
        let symbols = top_symbols(limit);
        let now = Utc::now();

        // Futures are collected up front so the stream stays `Send` inside handlers
        let fetches: Vec<_> = symbols
            .iter()
            .copied()
            .map(|symbol| async move {
                let chart = self.snapshot(symbol).await?;
                Ok::<_, ProviderError>(build_quote(symbol, &chart.info, &chart.candles, now))
            })
            .collect();

        let outcomes: Vec<Result<Option<Quote>, ProviderError>> = stream::iter(fetches)
            .buffered(self.fetch_concurrency)
            .collect()
            .await;

        let mut quotes = Vec::with_capacity(outcomes.len());
        let mut last_error = None;

        for (symbol, outcome) in symbols.into_iter().zip(outcomes) {
            match outcome {
                Ok(Some(quote)) => quotes.push(quote),
                Ok(None) => tracing::debug!("No data for {}, skipping", symbol),
                Err(e) => {
                    tracing::error!("Error fetching data for {}: {}", symbol, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if quotes.is_empty() => Err(e),
            _ => Ok(quotes),
        }
    }

    pub async fn quote_detail(
        &self,
        crypto_id: &str,
        period: &str,
    ) -> Result<QuoteDetail, ProviderError> {
        let symbol = resolve_symbol(crypto_id);

        let chart = self.provider.chart(&symbol, period, SNAPSHOT_INTERVAL).await?;

        build_detail(crypto_id, &symbol, &chart.info, &chart.candles, Utc::now())
            .ok_or(ProviderError::NotFound(symbol))
    }

    pub async fn quote_history(
        &self,
        crypto_id: &str,
        period: &str,
        interval: &str,
    ) -> Result<HistoryResponse, ProviderError> {
        let symbol = resolve_symbol(crypto_id);
        let candles = self.provider.chart(&symbol, period, interval).await?.candles;

        if candles.is_empty() {
            return Err(ProviderError::NotFound(symbol));
        }

        Ok(HistoryResponse {
            symbol,
            period: period.to_string(),
            interval: interval.to_string(),
            data: candles.iter().map(to_history_point).collect(),
        })
    }

    /// Table entries matching `query`, priced from a one-day snapshot.
    /// Failures are logged and the entry is left out.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let matches = search_symbols(query);

        let fetches: Vec<_> = matches
            .into_iter()
            .map(|(crypto_id, symbol)| async move {
                match self.snapshot(symbol).await {
                    Ok(chart) => build_search_result(crypto_id, symbol, &chart.info, &chart.candles),
                    Err(e) => {
                        tracing::error!("Error searching for {}: {}", symbol, e);
                        None
                    }
                }
            })
            .collect();

        let results: Vec<Option<SearchResult>> = stream::iter(fetches)
            .buffered(self.fetch_concurrency)
            .collect()
            .await;

        results.into_iter().flatten().collect()
    }

    /// Metadata plus one day of history from a single provider call. A
    /// symbol the provider does not know yields empty rows rather than an
    /// error.
    async fn snapshot(&self, symbol: &str) -> Result<Chart, ProviderError> {
        match self
            .provider
            .chart(symbol, SNAPSHOT_PERIOD, SNAPSHOT_INTERVAL)
            .await
        {
            Ok(chart) => Ok(chart),
            Err(e) if e.is_not_found() => Ok(Chart::default()),
            Err(e) => Err(e),
        }
    }
}

/// Change is measured from the first row's open to the last row's close.
fn summarize(candles: &[Candle]) -> Option<(&Candle, f64, f64, f64)> {
    let first = candles.first()?;
    let last = candles.last()?;
    let (change, percent) = price_change(last.close, first.open);
    Some((last, last.close, change, percent))
}

pub fn build_quote(
    symbol: &str,
    info: &TickerInfo,
    candles: &[Candle],
    now: DateTime<Utc>,
) -> Option<Quote> {
    let (last, current_price, change, percent) = summarize(candles)?;
    let base = base_symbol(symbol);

    Some(Quote {
        id: base.to_lowercase(),
        symbol: base.clone(),
        name: info.long_name.clone().unwrap_or(base),
        current_price: round_price(current_price),
        price_change_24h: round_price(change),
        price_change_percentage_24h: round_percent(percent),
        market_cap: info.market_cap.unwrap_or(0),
        volume: info.volume_24h.unwrap_or(last.volume),
        last_updated: now,
    })
}

pub fn build_detail(
    crypto_id: &str,
    symbol: &str,
    info: &TickerInfo,
    candles: &[Candle],
    now: DateTime<Utc>,
) -> Option<QuoteDetail> {
    let (last, current_price, change, percent) = summarize(candles)?;

    let high_window = candles.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let low_window = candles.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    let volumes: Vec<u64> = candles.iter().map(|c| c.volume).collect();

    Some(QuoteDetail {
        quote: Quote {
            id: crypto_id.to_string(),
            symbol: base_symbol(symbol),
            name: info
                .long_name
                .clone()
                .unwrap_or_else(|| crypto_id.to_uppercase()),
            current_price: round_price(current_price),
            price_change_24h: round_price(change),
            price_change_percentage_24h: round_percent(percent),
            market_cap: info.market_cap.unwrap_or(0),
            volume: last.volume,
            last_updated: now,
        },
        high_24h: round_price(last.high),
        low_24h: round_price(last.low),
        high_52w: round_price(high_window),
        low_52w: round_price(low_window),
        average_volume: mean_volume(&volumes),
        historical_data: candles.iter().map(to_history_point).collect(),
    })
}

pub fn build_search_result(
    crypto_id: &str,
    symbol: &str,
    info: &TickerInfo,
    candles: &[Candle],
) -> Option<SearchResult> {
    let last = candles.last()?;

    Some(SearchResult {
        id: crypto_id.to_string(),
        symbol: base_symbol(symbol),
        name: info
            .long_name
            .clone()
            .unwrap_or_else(|| crypto_id.to_uppercase()),
        current_price: round_price(last.close),
    })
}

pub fn to_history_point(candle: &Candle) -> HistoryPoint {
    HistoryPoint {
        timestamp: candle.timestamp,
        open: round_price(candle.open),
        high: round_price(candle.high),
        low: round_price(candle.low),
        close: round_price(candle.close),
        volume: candle.volume,
    }
}
