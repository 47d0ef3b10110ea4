//! Database models for transactions.

use chrono::Utc;
use diesel::prelude::*;

use crate::utils::{format_timestamp, parse_decimal_tolerant, parse_timestamp_tolerant};
use crypto_ledger_core::transactions::{NewTransaction, Transaction};

/// Database model for transactions
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: i64,
    pub symbol: String,
    pub amount: String,
    pub price_at_purchase: String,
    pub purchased_at: String,
    pub created_at: String,
}

/// Row inserted for a new transaction; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransactionDB {
    pub symbol: String,
    pub amount: String,
    pub price_at_purchase: String,
    pub purchased_at: String,
    pub created_at: String,
}

/// Full replacement of the user-editable columns.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct TransactionChangesetDB {
    pub symbol: String,
    pub amount: String,
    pub price_at_purchase: String,
    pub purchased_at: String,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            amount: parse_decimal_tolerant(&db.amount, "amount"),
            price_at_purchase: parse_decimal_tolerant(&db.price_at_purchase, "price_at_purchase"),
            purchased_at: parse_timestamp_tolerant(&db.purchased_at, "purchased_at"),
            created_at: parse_timestamp_tolerant(&db.created_at, "created_at"),
            symbol: db.symbol,
        }
    }
}

impl From<NewTransaction> for NewTransactionDB {
    fn from(domain: NewTransaction) -> Self {
        Self {
            symbol: domain.symbol,
            amount: domain.amount.to_string(),
            price_at_purchase: domain.price_at_purchase.to_string(),
            purchased_at: format_timestamp(domain.purchased_at),
            created_at: format_timestamp(Utc::now()),
        }
    }
}

impl From<NewTransaction> for TransactionChangesetDB {
    fn from(domain: NewTransaction) -> Self {
        Self {
            symbol: domain.symbol,
            amount: domain.amount.to_string(),
            price_at_purchase: domain.price_at_purchase.to_string(),
            purchased_at: format_timestamp(domain.purchased_at),
        }
    }
}
