//! Transactions module - purchase records, services, and traits.

mod transactions_errors;
mod transactions_model;
mod transactions_service;
mod transactions_traits;


#[cfg(test)]
mod transactions_service_tests;

pub use transactions_errors::TransactionError;
pub use transactions_model::{NewTransaction, SortDirection, Transaction, TransactionInput};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
