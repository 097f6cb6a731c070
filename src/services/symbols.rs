/// Crypto identifiers mapped to Yahoo Finance tickers, in listing order.
pub const CRYPTO_SYMBOLS: &[(&str, &str)] = &[
    ("bitcoin", "BTC-USD"),
    ("ethereum", "ETH-USD"),
    ("cardano", "ADA-USD"),
    ("solana", "SOL-USD"),
    ("dogecoin", "DOGE-USD"),
    ("chainlink", "LINK-USD"),
    ("polkadot", "DOT-USD"),
    ("litecoin", "LTC-USD"),
    ("bitcoin-cash", "BCH-USD"),
    ("stellar", "XLM-USD"),
    ("xrp", "XRP-USD"),
    ("matic", "MATIC-USD"),
    ("avalanche", "AVAX-USD"),
    ("shiba-inu", "SHIB-USD"),
    ("uniswap", "UNI-USD"),
];

const QUOTE_SUFFIX: &str = "-USD";

/// Convert a crypto id (e.g. "bitcoin") to a provider ticker (e.g. "BTC-USD").
/// Unknown ids fall back to `UPPER(id)-USD`.
pub fn resolve_symbol(crypto_id: &str) -> String {
    let id = crypto_id.to_lowercase();

    CRYPTO_SYMBOLS
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, ticker)| ticker.to_string())
        .unwrap_or_else(|| format!("{}{}", crypto_id.to_uppercase(), QUOTE_SUFFIX))
}

/// Strip the quote currency from a ticker: "BTC-USD" -> "BTC"
pub fn base_symbol(ticker: &str) -> String {
    ticker.replace(QUOTE_SUFFIX, "")
}

/// First `limit` tickers of the table
pub fn top_symbols(limit: usize) -> Vec<&'static str> {
    CRYPTO_SYMBOLS
        .iter()
        .take(limit)
        .map(|(_, ticker)| *ticker)
        .collect()
}

/// Entries whose id or ticker contains `query` (case-insensitive).
pub fn search_symbols(query: &str) -> Vec<(&'static str, &'static str)> {
    let query = query.to_lowercase();

    CRYPTO_SYMBOLS
        .iter()
        .filter(|(id, ticker)| id.contains(&query) || ticker.to_lowercase().contains(&query))
        .copied()
        .collect()
}
