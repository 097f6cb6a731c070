use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use quote_gateway::services::{
    provider::MarketDataProvider, quotes::QuoteService, yahoo::YahooFinanceService,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

type Requests = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

/// Stands in for Yahoo's chart endpoint and records every request it sees
async fn chart_stub(
    State(requests): State<Requests>,
    Path(symbol): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    requests.lock().unwrap().push((symbol.clone(), params));

    if symbol == "FOOBAR-USD" {
        let body = json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        });
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }

    Json(json!({
        "chart": {
            "result": [{
                "meta": {
                    "symbol": symbol,
                    "longName": format!("{} Long Name", symbol),
                    "regularMarketVolume": 1234
                },
                "timestamp": [1709251200, 1709337600],
                "indicators": {
                    "quote": [{
                        "open":   [100.0, 102.0],
                        "high":   [103.0, 104.0],
                        "low":    [99.0, 98.5],
                        "close":  [102.0, 99.5],
                        "volume": [500, 700]
                    }]
                }
            }],
            "error": null
        }
    }))
    .into_response()
}

/// Serve the stub on an ephemeral port and point a Yahoo client at it
async fn spawn_yahoo() -> (YahooFinanceService, Requests) {
    let requests: Requests = Arc::default();
    let app = Router::new()
        .route("/v8/finance/chart/{symbol}", get(chart_stub))
        .with_state(requests.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let service = YahooFinanceService::new(format!("http://{}", addr), None).unwrap();
    (service, requests)
}

fn range_and_interval(params: &HashMap<String, String>) -> (&str, &str) {
    (params["range"].as_str(), params["interval"].as_str())
}

#[tokio::test]
async fn test_chart_is_a_single_request() {
    let (yahoo, requests) = spawn_yahoo().await;

    let chart = yahoo.chart("BTC-USD", "7d", "1h").await.unwrap();

    assert_eq!(chart.candles.len(), 2);
    assert_eq!(chart.candles[1].close, 99.5);
    assert_eq!(chart.info.long_name.as_deref(), Some("BTC-USD Long Name"));
    assert_eq!(chart.info.volume_24h, Some(1234));
    assert_eq!(chart.info.market_cap, None);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "BTC-USD");
    assert_eq!(range_and_interval(&requests[0].1), ("7d", "1h"));
    assert_eq!(requests[0].1["includePrePost"], "false");
}

#[tokio::test]
async fn test_list_sends_one_request_per_symbol() {
    let (yahoo, requests) = spawn_yahoo().await;
    let service = QuoteService::new(Arc::new(yahoo), 2);

    let quotes = service.list_quotes(3).await.unwrap();
    let symbols: Vec<_> = quotes.iter().map(|q| q.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTC", "ETH", "ADA"]);
    assert_eq!(quotes[0].market_cap, 0);
    assert_eq!(quotes[0].volume, 1234);

    let requests = requests.lock().unwrap();
    let mut requested: Vec<_> = requests.iter().map(|(symbol, _)| symbol.as_str()).collect();
    requested.sort();
    assert_eq!(requested, vec!["ADA-USD", "BTC-USD", "ETH-USD"]);
    for (_, params) in requests.iter() {
        assert_eq!(range_and_interval(params), ("1d", "1d"));
    }
}

#[tokio::test]
async fn test_detail_sends_one_request_for_the_period() {
    let (yahoo, requests) = spawn_yahoo().await;
    let service = QuoteService::new(Arc::new(yahoo), 4);

    let detail = service.quote_detail("bitcoin", "7d").await.unwrap();
    assert_eq!(detail.quote.name, "BTC-USD Long Name");
    assert_eq!(detail.historical_data.len(), 2);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(range_and_interval(&requests[0].1), ("7d", "1d"));
}

#[tokio::test]
async fn test_search_sends_one_request_per_match() {
    let (yahoo, requests) = spawn_yahoo().await;
    let service = QuoteService::new(Arc::new(yahoo), 4);

    let results = service.search("bitcoin").await;
    let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["bitcoin", "bitcoin-cash"]);

    assert_eq!(requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_ticker_is_not_found() {
    let (yahoo, requests) = spawn_yahoo().await;

    let err = yahoo.chart("FOOBAR-USD", "30d", "1d").await.unwrap_err();
    assert!(err.is_not_found());

    let service = QuoteService::new(Arc::new(yahoo), 4);
    let err = service.quote_history("foobar", "30d", "1d").await.unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(requests.lock().unwrap().len(), 2);
}
