//! SQLite storage implementation for daily prices.

mod model;
mod repository;

pub use model::{DailyPriceDB, NewDailyPriceDB};
pub use repository::PriceRepository;
