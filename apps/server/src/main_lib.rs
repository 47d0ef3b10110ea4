use std::sync::Arc;

use crypto_ledger_core::{
    portfolio::history::{PortfolioHistoryService, PortfolioHistoryServiceTrait},
    prices::{PriceRepositoryTrait, PriceSyncConfig, PriceSyncService, PriceSyncServiceTrait},
    transactions::{TransactionRepositoryTrait, TransactionService, TransactionServiceTrait},
};
use crypto_ledger_market_data::{CoinGeckoProvider, MarketDataProvider, RateLimit, RateLimiter};
use crypto_ledger_storage_sqlite::{
    connect_with_retry, run_migrations, spawn_writer, PriceRepository, RetryPolicy,
    TransactionRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub history_service: Arc<dyn PortfolioHistoryServiceTrait>,
    pub price_sync_service: Arc<dyn PriceSyncServiceTrait>,
    pub price_repository: Arc<dyn PriceRepositoryTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("LEDGER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let retry_policy = RetryPolicy {
        max_attempts: config.db_connect_attempts,
        initial_backoff: config.db_connect_backoff,
        ..RetryPolicy::default()
    };
    let pool = connect_with_retry(&config.db_path, &retry_policy).await?;
    tracing::info!("Database path in use: {}", config.db_path);
    run_migrations(&pool)?;
    let writer = spawn_writer(pool.clone());

    let transaction_repository: Arc<dyn TransactionRepositoryTrait> =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let price_repository: Arc<dyn PriceRepositoryTrait> =
        Arc::new(PriceRepository::new(pool.clone(), writer.clone()));

    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        config.valuation_tz,
    ));
    let history_service = Arc::new(PortfolioHistoryService::new(
        transaction_repository,
        price_repository.clone(),
        config.valuation_tz,
    ));

    let provider: Arc<dyn MarketDataProvider> = Arc::new(
        CoinGeckoProvider::new(config.price_api_url.clone(), config.price_currency.clone())
            .with_rate_limit(RateLimit {
                min_delay: config.price_sync_delay,
            }),
    );
    let price_sync_service = Arc::new(PriceSyncService::new(
        provider,
        price_repository.clone(),
        Arc::new(RateLimiter::new()),
        PriceSyncConfig {
            symbols: config.price_symbols.clone(),
            lookback_days: config.price_lookback_days,
            valuation_tz: config.valuation_tz,
        },
    ));

    Ok(Arc::new(AppState {
        transaction_service,
        history_service,
        price_sync_service,
        price_repository,
    }))
}
