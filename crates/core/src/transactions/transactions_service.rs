use async_trait::async_trait;
use chrono_tz::Tz;
use log::{debug, info};
use std::sync::Arc;

use crate::errors::Error;
use crate::transactions::transactions_errors::TransactionError;
use crate::transactions::transactions_model::*;
use crate::transactions::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::Result;

/// Service for managing purchase transactions
pub struct TransactionService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    valuation_tz: Tz,
}

impl TransactionService {
    /// `valuation_tz` resolves date-only purchase timestamps.
    pub fn new(transaction_repository: Arc<dyn TransactionRepositoryTrait>, valuation_tz: Tz) -> Self {
        Self {
            transaction_repository,
            valuation_tz,
        }
    }

    fn not_found_as_transaction_error(transaction_id: i64) -> impl FnOnce(Error) -> Error {
        move |err| {
            if err.is_not_found() {
                TransactionError::NotFound(transaction_id).into()
            } else {
                err
            }
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.transaction_repository
            .list_transactions(SortDirection::Desc)
    }

    fn get_transaction(&self, transaction_id: i64) -> Result<Transaction> {
        self.transaction_repository
            .get_transaction(transaction_id)
            .map_err(Self::not_found_as_transaction_error(transaction_id))
    }

    async fn create_transaction(&self, input: TransactionInput) -> Result<Transaction> {
        let new_transaction = input.validate(self.valuation_tz)?;
        let created = self
            .transaction_repository
            .create_transaction(new_transaction)
            .await?;
        info!(
            "Created transaction {} ({} {} @ {})",
            created.id, created.amount, created.symbol, created.price_at_purchase
        );
        Ok(created)
    }

    async fn update_transaction(
        &self,
        transaction_id: i64,
        input: TransactionInput,
    ) -> Result<Transaction> {
        let replacement = input.validate(self.valuation_tz)?;
        let updated = self
            .transaction_repository
            .update_transaction(transaction_id, replacement)
            .await
            .map_err(Self::not_found_as_transaction_error(transaction_id))?;
        debug!("Updated transaction {}", updated.id);
        Ok(updated)
    }

    async fn delete_transaction(&self, transaction_id: i64) -> Result<Transaction> {
        let deleted = self
            .transaction_repository
            .delete_transaction(transaction_id)
            .await
            .map_err(Self::not_found_as_transaction_error(transaction_id))?;
        info!("Deleted transaction {}", deleted.id);
        Ok(deleted)
    }
}
