use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use axum::http::HeaderValue;
use chrono_tz::Tz;
use crypto_ledger_core::utils::time_utils::{parse_timezone, DEFAULT_VALUATION_TZ};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Timezone that turns purchase instants into calendar days.
    pub valuation_tz: Tz,
    pub price_api_url: String,
    pub price_currency: String,
    pub price_symbols: Vec<String>,
    pub price_lookback_days: i64,
    /// Minimum spacing between two price provider requests.
    pub price_sync_delay: Duration,
    /// `None` disables the background sync.
    pub price_sync_interval: Option<Duration>,
    pub db_connect_attempts: u32,
    pub db_connect_backoff: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: "./db/ledger.db".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            valuation_tz: DEFAULT_VALUATION_TZ,
            price_api_url: "https://api.coingecko.com/api/v3".to_string(),
            price_currency: "jpy".to_string(),
            price_symbols: vec!["BTC".to_string(), "ETH".to_string()],
            price_lookback_days: 365,
            price_sync_delay: Duration::from_millis(5_000),
            price_sync_interval: None,
            db_connect_attempts: 30,
            db_connect_backoff: Duration::from_millis(2_000),
        }
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Invalid {}: '{}' ({})", key, raw, e)),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Loads `.env` (if any) and reads `LEDGER_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = parse_or(
            lookup("LEDGER_LISTEN_ADDR"),
            "LEDGER_LISTEN_ADDR",
            defaults.listen_addr,
        )?;
        let db_path = lookup("LEDGER_DB_PATH").unwrap_or(defaults.db_path);

        let cors_allow = lookup("LEDGER_CORS_ALLOW_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or(defaults.cors_allow);
        for origin in cors_allow.iter().filter(|o| o.as_str() != "*") {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid LEDGER_CORS_ALLOW_ORIGINS entry '{}'", origin))?;
        }

        let timeout_ms: u64 = parse_or(lookup("LEDGER_REQUEST_TIMEOUT_MS"), "LEDGER_REQUEST_TIMEOUT_MS", 30_000)?;

        let valuation_tz = match lookup("LEDGER_VALUATION_TZ") {
            Some(name) => parse_timezone(&name).map_err(|e| anyhow!("LEDGER_VALUATION_TZ: {}", e))?,
            None => defaults.valuation_tz,
        };

        let price_api_url = lookup("LEDGER_PRICE_API_URL").unwrap_or(defaults.price_api_url);
        let price_currency = lookup("LEDGER_PRICE_CURRENCY")
            .map(|c| c.trim().to_lowercase())
            .unwrap_or(defaults.price_currency);

        let price_symbols = lookup("LEDGER_PRICE_SYMBOLS")
            .map(|raw| split_list(&raw).into_iter().map(|s| s.to_uppercase()).collect())
            .unwrap_or(defaults.price_symbols);
        if price_symbols.is_empty() {
            return Err(anyhow!("LEDGER_PRICE_SYMBOLS must name at least one symbol"));
        }

        let price_lookback_days: i64 = parse_or(
            lookup("LEDGER_PRICE_LOOKBACK_DAYS"),
            "LEDGER_PRICE_LOOKBACK_DAYS",
            defaults.price_lookback_days,
        )?;
        if price_lookback_days <= 0 {
            return Err(anyhow!("LEDGER_PRICE_LOOKBACK_DAYS must be positive"));
        }

        let delay_ms: u64 = parse_or(lookup("LEDGER_PRICE_SYNC_DELAY_MS"), "LEDGER_PRICE_SYNC_DELAY_MS", 5_000)?;
        let interval_secs: u64 = parse_or(
            lookup("LEDGER_PRICE_SYNC_INTERVAL_SECS"),
            "LEDGER_PRICE_SYNC_INTERVAL_SECS",
            0,
        )?;

        let db_connect_attempts: u32 = parse_or(
            lookup("LEDGER_DB_CONNECT_ATTEMPTS"),
            "LEDGER_DB_CONNECT_ATTEMPTS",
            defaults.db_connect_attempts,
        )?;
        let backoff_ms: u64 = parse_or(
            lookup("LEDGER_DB_CONNECT_BACKOFF_MS"),
            "LEDGER_DB_CONNECT_BACKOFF_MS",
            2_000,
        )?;

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            valuation_tz,
            price_api_url,
            price_currency,
            price_symbols,
            price_lookback_days,
            price_sync_delay: Duration::from_millis(delay_ms),
            price_sync_interval: (interval_secs > 0).then(|| Duration::from_secs(interval_secs)),
            db_connect_attempts,
            db_connect_backoff: Duration::from_millis(backoff_ms),
        })
    }
}
