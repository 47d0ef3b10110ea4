/// Well-known symbols surfaced as dedicated fields in the portfolio history.
pub const BTC_SYMBOL: &str = "BTC";
pub const ETH_SYMBOL: &str = "ETH";

/// Symbols synced from the price feed when none are configured.
pub const DEFAULT_SYNC_SYMBOLS: [&str; 2] = [BTC_SYMBOL, ETH_SYMBOL];

/// Trailing window of daily prices requested on every sync.
pub const DEFAULT_PRICE_LOOKBACK_DAYS: i64 = 365;

/// Message returned for unparseable purchase timestamps.
pub const INVALID_DATE_FORMAT_MESSAGE: &str = "Invalid date format. Use ISO 8601 or YYYY-MM-DD";
