pub mod history_calculator;
pub mod history_model;
pub mod history_service;


pub use history_calculator::*;
pub use history_model::*;
pub use history_service::{PortfolioHistoryService, PortfolioHistoryServiceTrait};
