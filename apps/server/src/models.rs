use crypto_ledger_core::prices::SymbolSyncResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Last day of the series, `YYYY-MM-DD`. Defaults to today.
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceSyncResponse {
    pub message: String,
    pub results: Vec<SymbolSyncResult>,
}
