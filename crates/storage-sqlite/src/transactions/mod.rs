//! SQLite storage implementation for purchase transactions.

mod model;
mod repository;


pub use model::{NewTransactionDB, TransactionChangesetDB, TransactionDB};
pub use repository::TransactionRepository;
