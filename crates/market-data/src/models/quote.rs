use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price observation returned by a provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol the quote belongs to (e.g. "BTC")
    pub symbol: String,

    /// Timestamp of the observation
    pub timestamp: DateTime<Utc>,

    /// Price in the quote currency
    pub close: Decimal,

    /// Quote currency (lowercase provider code, e.g. "jpy")
    pub currency: String,

    /// Provider the quote came from
    pub source: String,
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        close: Decimal,
        currency: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            close,
            currency: currency.into(),
            source: source.into(),
        }
    }
}
