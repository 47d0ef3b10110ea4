use chrono::NaiveDate;
use chrono_tz::Tz;
use log::{trace, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::constants::{BTC_SYMBOL, ETH_SYMBOL};
use crate::portfolio::history::PortfolioPoint;
use crate::prices::DailyPrice;
use crate::transactions::Transaction;
use crate::utils::time_utils::{get_days_between, valuation_date_from_utc};

/// `(date, symbol) -> price`
pub type DailyPriceMap<'a> = HashMap<(NaiveDate, &'a str), Decimal>;

/// Indexes prices by day and symbol. A repeated `(symbol, date)` keeps the last price seen.
pub fn build_price_map(prices: &[DailyPrice]) -> DailyPriceMap<'_> {
    let mut map = HashMap::with_capacity(prices.len());
    for price in prices {
        map.insert((price.date, price.symbol.as_str()), price.price);
    }
    map
}

/// Reconstructs the daily portfolio history from purchases and daily prices.
///
/// Emits one point per calendar day from the first purchase day to `as_of`,
/// both inclusive. Purchase days are taken in `tz`, which must be the zone the
/// price dates were keyed in. A symbol held on a day without a price for that
/// exact day is valued at zero.
///
/// Arithmetic is checked: a purchase whose quantity or cost would overflow is
/// skipped, and a value that would overflow counts as zero.
pub fn compute_history(
    transactions: &[Transaction],
    prices: &[DailyPrice],
    as_of: NaiveDate,
    tz: Tz,
) -> Vec<PortfolioPoint> {
    let mut dated: Vec<(NaiveDate, &Transaction)> = transactions
        .iter()
        .map(|t| (valuation_date_from_utc(t.purchased_at, tz), t))
        .collect();
    dated.sort_by_key(|(day, _)| *day);

    let Some(&(start, _)) = dated.first() else {
        return Vec::new();
    };

    let price_map = build_price_map(prices);
    let days = get_days_between(start, as_of);

    let mut holdings: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut total_investment = Decimal::ZERO;
    let mut pending = dated.iter().peekable();
    let mut history = Vec::with_capacity(days.len());

    for day in days {
        while let Some((_, tx)) = pending.next_if(|(tx_day, _)| *tx_day <= day) {
            let held = holdings.get(tx.symbol.as_str()).copied().unwrap_or_default();
            let quantity = held.checked_add(tx.amount);
            let investment = tx.cost().and_then(|cost| total_investment.checked_add(cost));
            match (quantity, investment) {
                (Some(quantity), Some(investment)) => {
                    holdings.insert(tx.symbol.as_str(), quantity);
                    total_investment = investment;
                }
                _ => warn!(
                    "Skipping transaction {} ({} {} at {}): amount out of range",
                    tx.id, tx.amount, tx.symbol, tx.price_at_purchase
                ),
            }
        }

        let mut point = PortfolioPoint::empty(day);
        point.total_investment = total_investment;

        for (&symbol, &quantity) in holdings.iter().filter(|(_, q)| !q.is_zero()) {
            let value = match price_map.get(&(day, symbol)) {
                Some(price) => quantity.checked_mul(*price).unwrap_or_else(|| {
                    warn!("Value of {} {} on {} is out of range, valuing at zero", quantity, symbol, day);
                    Decimal::ZERO
                }),
                None => {
                    trace!("No price for {} on {}, valuing at zero", symbol, day);
                    Decimal::ZERO
                }
            };
            match point.total_value.checked_add(value) {
                Some(total) => {
                    point.total_value = total;
                    point.values.insert(symbol.to_string(), value);
                }
                None => warn!("Total value on {} is out of range, leaving out {}", day, symbol),
            }
        }

        point.btc_value = point.values.get(BTC_SYMBOL).copied().unwrap_or_default();
        point.eth_value = point.values.get(ETH_SYMBOL).copied().unwrap_or_default();
        history.push(point);
    }

    history
}
