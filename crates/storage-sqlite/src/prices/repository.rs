use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use diesel::upsert::excluded;
use log::debug;
use std::sync::Arc;

use super::model::{DailyPriceDB, NewDailyPriceDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::daily_prices;
use crate::utils::format_timestamp;
use crypto_ledger_core::prices::{DailyPrice, NewDailyPrice, PriceRepositoryTrait};
use crypto_ledger_core::Result;

pub struct PriceRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PriceRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PriceRepositoryTrait for PriceRepository {
    fn list_prices(&self) -> Result<Vec<DailyPrice>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = daily_prices::table
            .select(DailyPriceDB::as_select())
            .order((daily_prices::date.asc(), daily_prices::symbol.asc()))
            .load::<DailyPriceDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(DailyPrice::from).collect())
    }

    fn list_prices_for_symbol(&self, symbol: &str) -> Result<Vec<DailyPrice>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = daily_prices::table
            .filter(daily_prices::symbol.eq(symbol))
            .select(DailyPriceDB::as_select())
            .order(daily_prices::date.asc())
            .load::<DailyPriceDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(DailyPrice::from).collect())
    }

    async fn upsert_prices(&self, prices: &[NewDailyPrice]) -> Result<usize> {
        if prices.is_empty() {
            return Ok(0);
        }

        let now = format_timestamp(Utc::now());
        let rows: Vec<NewDailyPriceDB> = prices
            .iter()
            .map(|p| NewDailyPriceDB::from_domain(p, &now))
            .collect();

        let written = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut written = 0;
                for row in &rows {
                    written += diesel::insert_into(daily_prices::table)
                        .values(row)
                        .on_conflict((daily_prices::symbol, daily_prices::date))
                        .do_update()
                        .set((
                            daily_prices::price.eq(excluded(daily_prices::price)),
                            daily_prices::updated_at.eq(excluded(daily_prices::updated_at)),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(written)
            })
            .await?;

        debug!("Upserted {} daily price row(s)", written);
        Ok(written)
    }
}
