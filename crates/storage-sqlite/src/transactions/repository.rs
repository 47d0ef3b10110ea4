use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::{NewTransactionDB, TransactionChangesetDB, TransactionDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::transactions;
use crypto_ledger_core::transactions::{
    NewTransaction, SortDirection, Transaction, TransactionRepositoryTrait,
};
use crypto_ledger_core::Result;

pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn list_transactions(&self, order: SortDirection) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let query = transactions::table
            .select(TransactionDB::as_select())
            .into_boxed();
        let query = match order {
            SortDirection::Asc => {
                query.order((transactions::purchased_at.asc(), transactions::id.asc()))
            }
            SortDirection::Desc => {
                query.order((transactions::purchased_at.desc(), transactions::id.desc()))
            }
        };

        let rows = query.load::<TransactionDB>(&mut conn).into_core()?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    fn get_transaction(&self, transaction_id: i64) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        let row = transactions::table
            .select(TransactionDB::as_select())
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)
            .into_core()?;
        Ok(row.into())
    }

    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let row = NewTransactionDB::from(new_transaction);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let inserted = diesel::insert_into(transactions::table)
                    .values(&row)
                    .returning(TransactionDB::as_returning())
                    .get_result::<TransactionDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted.into())
            })
            .await
    }

    async fn update_transaction(
        &self,
        transaction_id: i64,
        replacement: NewTransaction,
    ) -> Result<Transaction> {
        let changes = TransactionChangesetDB::from(replacement);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let updated = diesel::update(transactions::table.find(transaction_id))
                    .set(&changes)
                    .returning(TransactionDB::as_returning())
                    .get_result::<TransactionDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(updated.into())
            })
            .await
    }

    async fn delete_transaction(&self, transaction_id: i64) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let existing = transactions::table
                    .select(TransactionDB::as_select())
                    .find(transaction_id)
                    .first::<TransactionDB>(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(transactions::table.find(transaction_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(existing.into())
            })
            .await
    }
}
