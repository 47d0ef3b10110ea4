//! Background scheduler for periodic price sync.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Delay before the first scheduled run.
const INITIAL_DELAY_SECS: u64 = 60;

/// Starts the background price sync scheduler.
pub fn start_price_sync_scheduler(state: Arc<AppState>, every: Duration) {
    tokio::spawn(async move {
        info!("Price sync scheduler started ({:?} interval)", every);

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut sync_interval = interval(every);
        sync_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            sync_interval.tick().await;
            run_scheduled_sync(&state).await;
        }
    });
}

/// Runs a single scheduled sync.
async fn run_scheduled_sync(state: &Arc<AppState>) {
    info!("Running scheduled price sync...");
    match state.price_sync_service.sync_prices().await {
        Ok(summary) => {
            let failed = summary.failed_symbols();
            if failed.is_empty() {
                info!(
                    "Scheduled price sync completed for {} symbols",
                    summary.results.len()
                );
            } else {
                warn!(
                    "Scheduled price sync completed with failures for: {}",
                    failed.join(", ")
                );
            }
        }
        Err(e) => warn!("Scheduled price sync failed: {}", e),
    }
}
