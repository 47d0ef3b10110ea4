//! CoinGecko provider for historical crypto prices.
//!
//! Uses the public `market_chart/range` endpoint. The free tier allows roughly
//! 10-30 requests per minute, hence the conservative default pacing.

mod models;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::{MarketDataProvider, RateLimit};

use models::MarketChartResponse;

/// Provider ID constant
const PROVIDER_ID: &str = "COINGECKO";

/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency used when none is configured.
pub const DEFAULT_VS_CURRENCY: &str = "jpy";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// CoinGecko provider.
///
/// # Example
///
/// ```ignore
/// use crypto_ledger_market_data::CoinGeckoProvider;
///
/// let provider = CoinGeckoProvider::new(DEFAULT_BASE_URL, "jpy")
///     .with_coin_id("SOL", "solana");
/// ```
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    vs_currency: String,
    coin_ids: HashMap<String, String>,
    rate_limit: RateLimit,
}

impl CoinGeckoProvider {
    pub fn new(base_url: impl Into<String>, vs_currency: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        let coin_ids = [("BTC", "bitcoin"), ("ETH", "ethereum")]
            .into_iter()
            .map(|(symbol, id)| (symbol.to_string(), id.to_string()))
            .collect();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            vs_currency: vs_currency.into().to_lowercase(),
            coin_ids,
            rate_limit: RateLimit::default(),
        }
    }

    /// Register (or override) the CoinGecko coin id for a ticker symbol.
    pub fn with_coin_id(mut self, symbol: &str, coin_id: &str) -> Self {
        self.coin_ids
            .insert(symbol.to_uppercase(), coin_id.to_string());
        self
    }

    /// Override the pacing advertised to callers.
    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    fn coin_id(&self, symbol: &str) -> Result<&str, MarketDataError> {
        self.coin_ids
            .get(&symbol.to_uppercase())
            .map(String::as_str)
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    fn range_url(&self, coin_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!(
            "{}/coins/{}/market_chart/range?vs_currency={}&from={}&to={}",
            self.base_url,
            coin_id,
            self.vs_currency,
            start.timestamp(),
            end.timestamp()
        )
    }

    fn provider_error(message: impl Into<String>) -> MarketDataError {
        MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: message.into(),
        }
    }
}

/// Converts a `market_chart/range` body into quotes sorted by timestamp.
///
/// Points with an invalid timestamp, a non-finite price or a negative price are skipped.
fn parse_market_chart(
    symbol: &str,
    body: &str,
    vs_currency: &str,
) -> Result<Vec<Quote>, MarketDataError> {
    let chart: MarketChartResponse = serde_json::from_str(body)
        .map_err(|e| CoinGeckoProvider::provider_error(format!("Invalid response body: {}", e)))?;

    let mut quotes: Vec<Quote> = chart
        .prices
        .into_iter()
        .filter_map(|(millis, price)| {
            let timestamp = Utc.timestamp_millis_opt(millis as i64).single()?;
            match Decimal::try_from(price) {
                Ok(close) if !close.is_sign_negative() => Some(Quote::new(
                    symbol,
                    timestamp,
                    close,
                    vs_currency,
                    PROVIDER_ID,
                )),
                _ => {
                    warn!(
                        "Skipping invalid {} price {} at {} from {}",
                        symbol, price, timestamp, PROVIDER_ID
                    );
                    None
                }
            }
        })
        .collect();

    quotes.sort_by_key(|q| q.timestamp);
    Ok(quotes)
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        self.rate_limit.clone()
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError> {
        let coin_id = self.coin_id(symbol)?;
        let url = self.range_url(coin_id, start, end);
        debug!("Fetching {} history from {}", symbol, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(Self::provider_error(format!("HTTP {}: {}", status, body)));
        }

        parse_market_chart(symbol, &body, &self.vs_currency)
    }
}
