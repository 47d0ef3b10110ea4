use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::prices_model::{DailyPrice, NewDailyPrice, PriceSyncSummary};
use crate::Result;

/// Trait defining the contract for daily price storage.
#[async_trait]
pub trait PriceRepositoryTrait: Send + Sync {
    /// All prices ordered by date, then symbol.
    fn list_prices(&self) -> Result<Vec<DailyPrice>>;
    fn list_prices_for_symbol(&self, symbol: &str) -> Result<Vec<DailyPrice>>;
    /// Inserts or overwrites by `(symbol, date)`. Returns the number of rows written.
    async fn upsert_prices(&self, prices: &[NewDailyPrice]) -> Result<usize>;
}

#[async_trait]
pub trait PriceSyncServiceTrait: Send + Sync {
    async fn sync_prices(&self) -> Result<PriceSyncSummary>;
    /// Sync the lookback window ending at `now`.
    async fn sync_prices_as_of(&self, now: DateTime<Utc>) -> Result<PriceSyncSummary>;
}
