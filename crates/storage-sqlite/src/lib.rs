//! SQLite storage implementation for the crypto ledger.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `crypto-ledger-core` and contains:
//! - Database connection pooling and bounded-retry startup
//! - Diesel migrations
//! - Repository implementations for transactions and daily prices
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod prices;
pub mod transactions;

// Re-export database utilities
pub use db::{
    connect_with_retry, create_pool, get_connection, init, run_migrations, spawn_writer,
    DbConnection, DbPool, RetryPolicy, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use prices::PriceRepository;
pub use transactions::TransactionRepository;

// Re-export from crypto-ledger-core for convenience
pub use crypto_ledger_core::errors::{DatabaseError, Error, Result};
