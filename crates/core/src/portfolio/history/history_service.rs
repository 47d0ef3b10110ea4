use chrono::NaiveDate;
use chrono_tz::Tz;
use log::debug;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::Result;
use crate::portfolio::history::{compute_history, PortfolioPoint};
use crate::prices::PriceRepositoryTrait;
use crate::transactions::{SortDirection, TransactionRepositoryTrait};
use crate::utils::time_utils;

pub trait PortfolioHistoryServiceTrait: Send + Sync {
    /// Daily history up to `as_of`, defaulting to today in the valuation timezone.
    fn get_history(&self, as_of: Option<NaiveDate>) -> Result<Vec<PortfolioPoint>>;
}

/// Loads a fresh snapshot of transactions and prices and runs the valuation engine.
///
/// The two collections are read one after the other, not atomically.
pub struct PortfolioHistoryService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
    valuation_tz: Tz,
}

impl PortfolioHistoryService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
        valuation_tz: Tz,
    ) -> Self {
        Self {
            transaction_repository,
            price_repository,
            valuation_tz,
        }
    }
}

impl PortfolioHistoryServiceTrait for PortfolioHistoryService {
    fn get_history(&self, as_of: Option<NaiveDate>) -> Result<Vec<PortfolioPoint>> {
        let as_of = as_of.unwrap_or_else(|| time_utils::valuation_date_today(self.valuation_tz));

        let transactions = self
            .transaction_repository
            .list_transactions(SortDirection::Asc)?;
        let prices = self.price_repository.list_prices()?;

        let started = Instant::now();
        let history = compute_history(&transactions, &prices, as_of, self.valuation_tz);
        debug!(
            "Computed {} history point(s) from {} transaction(s) and {} price(s) in {:?}",
            history.len(),
            transactions.len(),
            prices.len(),
            started.elapsed()
        );
        Ok(history)
    }
}
