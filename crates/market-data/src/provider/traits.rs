//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::Quote;

use super::capabilities::RateLimit;

/// Trait for historical price providers.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use crypto_ledger_market_data::provider::{MarketDataProvider, RateLimit};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     // ... implement get_historical_quotes
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used for logging and pacing.
    fn id(&self) -> &'static str;

    /// Rate limiting configuration applied by callers before each request.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch historical quotes for `symbol` between `start` and `end` (inclusive).
    ///
    /// Quotes are returned in ascending timestamp order. A provider may return
    /// several quotes for the same calendar day (e.g. hourly granularity).
    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError>;
}
