//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching prices from a provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not know this symbol.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// The provider answered with an error status or an unreadable body.
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether a later attempt (in a later sync run) could plausibly succeed.
    ///
    /// Callers never retry within the same run; this only picks the log level.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ProviderError { .. }
            | Self::Network(_) => true,
            Self::SymbolNotFound(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_is_transient() {
        let error = MarketDataError::RateLimited {
            provider: "COINGECKO".to_string(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn test_symbol_not_found_is_terminal() {
        let error = MarketDataError::SymbolNotFound("DOGE".to_string());
        assert!(!error.is_transient());
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("XYZ".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: XYZ");

        let error = MarketDataError::ProviderError {
            provider: "COINGECKO".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider error: COINGECKO - HTTP 500");
    }
}
