use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_SERVICE_NAME: &str = "crypto-data-api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub yahoo_base_url: String,
    pub provider_timeout: Option<Duration>,
    pub fetch_concurrency: usize,
    pub list_limit: usize,
    pub service_name: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            provider_timeout: None,
            fetch_concurrency: 4,
            list_limit: 10,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Read `.env` (if any) and the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_format = match lookup("LOG_FORMAT") {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            yahoo_base_url: lookup("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            provider_timeout: lookup("PROVIDER_TIMEOUT_SECS")
                .map(|v| {
                    v.parse::<u64>()
                        .with_context(|| format!("PROVIDER_TIMEOUT_SECS must be an integer, got '{}'", v))
                })
                .transpose()?
                .map(Duration::from_secs),
            fetch_concurrency: parse_or(&lookup, "FETCH_CONCURRENCY", defaults.fetch_concurrency)?
                .max(1),
            list_limit: parse_or(&lookup, "LIST_LIMIT", defaults.list_limit)?,
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            log_format,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}
