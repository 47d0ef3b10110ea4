use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Portfolio state at the end of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPoint {
    pub date: NaiveDate,
    /// Sum of `values`.
    pub total_value: Decimal,
    /// Cumulative money spent, independent of price availability.
    pub total_investment: Decimal,
    pub btc_value: Decimal,
    pub eth_value: Decimal,
    /// Market value per symbol with non-zero holdings (zero when the day has no price).
    pub values: BTreeMap<String, Decimal>,
}

impl PortfolioPoint {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_value: Decimal::ZERO,
            total_investment: Decimal::ZERO,
            btc_value: Decimal::ZERO,
            eth_value: Decimal::ZERO,
            values: BTreeMap::new(),
        }
    }
}
