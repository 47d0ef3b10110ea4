use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::{error::ApiResult, main_lib::AppState, models::PriceSyncResponse};

/// Runs one sync. Per-symbol failures are reported in `results`, never as an error status.
async fn sync_prices(State(state): State<Arc<AppState>>) -> ApiResult<Json<PriceSyncResponse>> {
    let summary = state.price_sync_service.sync_prices().await?;
    Ok(Json(PriceSyncResponse {
        message: "Prices synced successfully".to_string(),
        results: summary.results,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/prices/sync", post(sync_prices))
}
