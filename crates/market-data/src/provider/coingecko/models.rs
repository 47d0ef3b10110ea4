//! CoinGecko API response models.

use serde::Deserialize;

/// Response of `/coins/{id}/market_chart/range`.
///
/// Every series is a list of `[unix_millis, value]` pairs. Only prices are used.
#[derive(Debug, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<(f64, f64)>,
}
