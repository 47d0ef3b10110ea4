//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Rate limiting configuration
//! - Concrete provider implementations

mod capabilities;
mod traits;

pub mod coingecko;

pub use capabilities::RateLimit;
pub use traits::MarketDataProvider;
