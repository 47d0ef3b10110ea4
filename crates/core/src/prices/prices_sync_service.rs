use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use crypto_ledger_market_data::{MarketDataProvider, RateLimiter};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::prices_model::*;
use super::{PriceRepositoryTrait, PriceSyncServiceTrait};
use crate::Result;

/// Pulls trailing daily prices from a provider and upserts them.
///
/// Symbols are processed one after another with the provider's pacing applied
/// between requests. A failing symbol is logged and skipped.
pub struct PriceSyncService {
    provider: Arc<dyn MarketDataProvider>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
    rate_limiter: Arc<RateLimiter>,
    config: PriceSyncConfig,
    sync_lock: Mutex<()>,
}

impl PriceSyncService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
        rate_limiter: Arc<RateLimiter>,
        config: PriceSyncConfig,
    ) -> Self {
        rate_limiter.configure(provider.id(), provider.rate_limit());
        Self {
            provider,
            price_repository,
            rate_limiter,
            config,
            sync_lock: Mutex::new(()),
        }
    }

    async fn sync_symbol(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SymbolSyncResult {
        let mut result = SymbolSyncResult {
            symbol: symbol.to_string(),
            fetched: 0,
            upserted: 0,
            error: None,
        };

        self.rate_limiter.acquire(self.provider.id()).await;

        let quotes = match self
            .provider
            .get_historical_quotes(symbol, start, end)
            .await
        {
            Ok(quotes) => quotes,
            Err(e) if e.is_transient() => {
                warn!(
                    "Failed to fetch prices for {} from {}: {}",
                    symbol,
                    self.provider.id(),
                    e
                );
                result.error = Some(e.to_string());
                return result;
            }
            Err(e) => {
                error!(
                    "Cannot fetch prices for {} from {}: {}",
                    symbol,
                    self.provider.id(),
                    e
                );
                result.error = Some(e.to_string());
                return result;
            }
        };

        let daily = collapse_to_daily(symbol, &quotes, self.config.valuation_tz);
        result.fetched = daily.len();
        info!("Fetched {} prices for {}", daily.len(), symbol);

        if daily.is_empty() {
            return result;
        }

        match self.price_repository.upsert_prices(&daily).await {
            Ok(written) => result.upserted = written,
            Err(e) => {
                error!("Failed to store prices for {}: {}", symbol, e);
                result.error = Some(e.to_string());
            }
        }
        result
    }
}

#[async_trait]
impl PriceSyncServiceTrait for PriceSyncService {
    async fn sync_prices(&self) -> Result<PriceSyncSummary> {
        self.sync_prices_as_of(Utc::now()).await
    }

    async fn sync_prices_as_of(&self, now: DateTime<Utc>) -> Result<PriceSyncSummary> {
        let _guard = self.sync_lock.lock().await;

        let started_at = Utc::now();
        let start = now - Duration::days(self.config.lookback_days);
        debug!(
            "Syncing {} symbol(s) from {} to {}",
            self.config.symbols.len(),
            start,
            now
        );

        let mut results = Vec::with_capacity(self.config.symbols.len());
        for symbol in &self.config.symbols {
            results.push(self.sync_symbol(symbol, start, now).await);
        }

        let summary = PriceSyncSummary {
            started_at,
            finished_at: Utc::now(),
            results,
        };

        let failed = summary.failed_symbols();
        if failed.is_empty() {
            info!("Price sync completed for all symbols");
        } else {
            warn!("Price sync completed with failures for: {}", failed.join(", "));
        }
        Ok(summary)
    }
}
