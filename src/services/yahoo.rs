use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::services::provider::{Candle, Chart, MarketDataProvider, ProviderError, TickerInfo};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Yahoo Finance chart API client
#[derive(Clone)]
pub struct YahooFinanceService {
    client: Client,
    base_url: String,
}

// Chart API response structures
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

// Yahoo omits these for some instruments; numbers may come as floats.
// The chart meta carries no market cap.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    long_name: Option<String>,
    regular_market_volume: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteIndicator>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteIndicator {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl YahooFinanceService {
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Malformed(format!("invalid base url {}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::Malformed(format!("base url {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);

        Ok(url)
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<ChartResult, ProviderError> {
        tracing::debug!("Fetching chart for {} (range={}, interval={}) from Yahoo", symbol, range, interval);

        let response = self
            .client
            .get(self.chart_url(symbol)?)
            .header("accept", "application/json")
            .query(&[("range", range), ("interval", interval), ("includePrePost", "false")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        parse_chart(symbol, status, &body)
    }
}

fn parse_chart(symbol: &str, status: StatusCode, body: &str) -> Result<ChartResult, ProviderError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ProviderError::NotFound(symbol.to_string()));
    }

    let envelope: ChartEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }
        Err(e) => return Err(ProviderError::Malformed(e.to_string())),
    };

    if let Some(error) = envelope.chart.error {
        if error.code.eq_ignore_ascii_case("not found") {
            return Err(ProviderError::NotFound(symbol.to_string()));
        }
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: format!("{}: {}", error.code, error.description.unwrap_or_default()),
        });
    }

    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
}

fn to_ticker_info(meta: ChartMeta) -> TickerInfo {
    TickerInfo {
        long_name: meta.long_name,
        market_cap: None,
        volume_24h: meta.regular_market_volume.map(|v| v as u64),
    }
}

/// Zip the parallel indicator arrays into rows. Rows missing any of the
/// OHLC values are dropped; a missing volume counts as zero.
fn to_candles(result: ChartResult) -> Result<Vec<Candle>, ProviderError> {
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(vec![]);
    };

    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    let mut candles = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        ) else {
            tracing::debug!("Skipping incomplete row at {}", ts);
            continue;
        };

        let timestamp = DateTime::from_timestamp(*ts, 0)
            .ok_or_else(|| ProviderError::Malformed(format!("timestamp out of range: {}", ts)))?;

        candles.push(Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume: at(&quote.volume, i).map(|v| v as u64).unwrap_or(0),
        });
    }

    Ok(candles)
}

#[async_trait]
impl MarketDataProvider for YahooFinanceService {
    async fn chart(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Chart, ProviderError> {
        let mut result = self.fetch_chart(symbol, period, interval).await?;
        let info = to_ticker_info(std::mem::take(&mut result.meta));
        let candles = to_candles(result)?;

        tracing::debug!("Fetched {} rows for {} ({} @ {})", candles.len(), symbol, period, interval);

        Ok(Chart { info, candles })
    }
}
