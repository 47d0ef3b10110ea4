//! Prices module - daily closing prices and the price feed sync.

mod prices_model;
mod prices_sync_service;
mod prices_traits;


pub use prices_model::{
    collapse_to_daily, DailyPrice, NewDailyPrice, PriceSyncConfig, PriceSyncSummary,
    SymbolSyncResult,
};
pub use prices_sync_service::PriceSyncService;
pub use prices_traits::{PriceRepositoryTrait, PriceSyncServiceTrait};
