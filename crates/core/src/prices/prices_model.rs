use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use crypto_ledger_market_data::Quote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_PRICE_LOOKBACK_DAYS, DEFAULT_SYNC_SYMBOLS};
use crate::utils::time_utils::{valuation_date_from_utc, DEFAULT_VALUATION_TZ};

/// Closing price of a symbol on a calendar day. Unique per `(symbol, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPrice {
    pub id: i64,
    pub symbol: String,
    pub date: NaiveDate,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Price to insert, or to overwrite the existing row of the same `(symbol, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDailyPrice {
    pub symbol: String,
    pub date: NaiveDate,
    pub price: Decimal,
}

/// Reduces a quote series to one price per calendar day in `tz`.
///
/// The latest quote of each day wins; among equal timestamps the later one in
/// the input wins.
pub fn collapse_to_daily(symbol: &str, quotes: &[Quote], tz: Tz) -> Vec<NewDailyPrice> {
    let mut ordered: Vec<&Quote> = quotes.iter().collect();
    ordered.sort_by_key(|q| q.timestamp);

    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for quote in ordered {
        by_day.insert(valuation_date_from_utc(quote.timestamp, tz), quote.close);
    }

    by_day
        .into_iter()
        .map(|(date, price)| NewDailyPrice {
            symbol: symbol.to_string(),
            date,
            price,
        })
        .collect()
}

/// What a sync run fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSyncConfig {
    /// Symbols, synced in this order.
    pub symbols: Vec<String>,
    pub lookback_days: i64,
    /// Zone whose calendar days key the stored prices.
    pub valuation_tz: Tz,
}

impl Default for PriceSyncConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYNC_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            lookback_days: DEFAULT_PRICE_LOOKBACK_DAYS,
            valuation_tz: DEFAULT_VALUATION_TZ,
        }
    }
}

/// Outcome of syncing one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSyncResult {
    pub symbol: String,
    /// Daily prices received from the provider.
    pub fetched: usize,
    pub upserted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SymbolSyncResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSyncSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<SymbolSyncResult>,
}

impl PriceSyncSummary {
    pub fn failed_symbols(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.symbol.as_str())
            .collect()
    }
}
