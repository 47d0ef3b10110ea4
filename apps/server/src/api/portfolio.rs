use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use crypto_ledger_core::portfolio::history::PortfolioPoint;
use crypto_ledger_core::utils::time_utils::parse_date;

use crate::{error::ApiResult, main_lib::AppState, models::HistoryQuery};

async fn get_portfolio_history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PortfolioPoint>>> {
    let Query(query) = query?;
    let as_of = query.as_of.as_deref().map(parse_date).transpose()?;
    let history = state.history_service.get_history(as_of)?;
    Ok(Json(history))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/portfolio/history", get(get_portfolio_history))
}
