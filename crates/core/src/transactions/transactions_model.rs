use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::parse_purchase_timestamp;

/// A stored purchase.
///
/// Updates replace every user-supplied field; `created_at` never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub symbol: String,
    pub amount: Decimal,
    pub price_at_purchase: Decimal,
    pub purchased_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Money spent on this purchase, `None` if it does not fit in a `Decimal`.
    pub fn cost(&self) -> Option<Decimal> {
        self.amount.checked_mul(self.price_at_purchase)
    }
}

/// Request body for creating or replacing a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub symbol: String,
    pub amount: Decimal,
    pub price_at_purchase: Decimal,
    /// RFC 3339 timestamp or plain `YYYY-MM-DD`.
    pub purchased_at: String,
}

/// Validated transaction ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub symbol: String,
    pub amount: Decimal,
    pub price_at_purchase: Decimal,
    pub purchased_at: DateTime<Utc>,
}

impl TransactionInput {
    /// Normalizes and validates the input.
    ///
    /// Plain dates are resolved to midnight in `tz`.
    pub fn validate(&self, tz: Tz) -> Result<NewTransaction> {
        let symbol = self.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Symbol cannot be empty".to_string(),
            )));
        }

        if self.price_at_purchase < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Price at purchase cannot be negative".to_string(),
            )));
        }

        if self.amount.checked_mul(self.price_at_purchase).is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Amount times price at purchase is too large".to_string(),
            )));
        }

        let purchased_at = parse_purchase_timestamp(&self.purchased_at, tz)?;

        Ok(NewTransaction {
            symbol,
            amount: self.amount,
            price_at_purchase: self.price_at_purchase,
            purchased_at,
        })
    }
}

/// Ordering on `purchased_at`, ties broken by id in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}
