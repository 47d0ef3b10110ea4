//! Crypto Ledger Market Data Crate
//!
//! Fetches historical daily price series for crypto assets from external
//! providers. The crate knows nothing about storage; callers persist the
//! returned [`Quote`]s themselves.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +------------------+
//! |  Price sync job  | --> |   RateLimiter    |  (fixed spacing per provider)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (CoinGecko, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Quote        |
//!                          +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::MarketDataError;
pub use models::Quote;
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::{MarketDataProvider, RateLimit};
pub use registry::RateLimiter;
