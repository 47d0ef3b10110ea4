use async_trait::async_trait;

use super::transactions_model::{NewTransaction, SortDirection, Transaction, TransactionInput};
use crate::Result;

/// Trait defining the contract for Transaction repository operations.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn list_transactions(&self, order: SortDirection) -> Result<Vec<Transaction>>;
    fn get_transaction(&self, transaction_id: i64) -> Result<Transaction>;
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    /// Replaces all user fields of an existing transaction.
    async fn update_transaction(
        &self,
        transaction_id: i64,
        replacement: NewTransaction,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: i64) -> Result<Transaction>;
}

/// Trait defining the contract for Transaction service operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// All transactions, newest purchase first.
    fn list_transactions(&self) -> Result<Vec<Transaction>>;
    fn get_transaction(&self, transaction_id: i64) -> Result<Transaction>;
    async fn create_transaction(&self, input: TransactionInput) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        transaction_id: i64,
        input: TransactionInput,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: i64) -> Result<Transaction>;
}
