//! Database models for daily prices.

use diesel::prelude::*;

use crate::utils::{format_date, parse_date_tolerant, parse_decimal_tolerant, parse_timestamp_tolerant};
use crypto_ledger_core::prices::{DailyPrice, NewDailyPrice};

/// Database model for daily prices
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::daily_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyPriceDB {
    pub id: i64,
    pub symbol: String,
    pub date: String,
    pub price: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::daily_prices)]
pub struct NewDailyPriceDB {
    pub symbol: String,
    pub date: String,
    pub price: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DailyPriceDB> for DailyPrice {
    fn from(db: DailyPriceDB) -> Self {
        Self {
            id: db.id,
            date: parse_date_tolerant(&db.date, "date"),
            price: parse_decimal_tolerant(&db.price, "price"),
            created_at: parse_timestamp_tolerant(&db.created_at, "created_at"),
            updated_at: parse_timestamp_tolerant(&db.updated_at, "updated_at"),
            symbol: db.symbol,
        }
    }
}

impl NewDailyPriceDB {
    /// Row for `price`, stamped with `now` for both timestamps.
    pub fn from_domain(price: &NewDailyPrice, now: &str) -> Self {
        Self {
            symbol: price.symbol.clone(),
            date: format_date(price.date),
            price: price.price.to_string(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}
