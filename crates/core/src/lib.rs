//! Crypto Ledger Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the ledger: purchase
//! transactions, daily prices, the price sync orchestration and the
//! portfolio valuation engine. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod prices;
pub mod transactions;
pub mod utils;

pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
