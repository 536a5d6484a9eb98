use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};
use crate::state::AppState;

const FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Retries persistence for bookings whose last submission failed. The
/// in-memory store stays authoritative either way; this loop only narrows
/// the window where the repository lags behind it.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting persistence retry worker...");

    loop {
        let before = state.store.dirty_count();
        if before > 0 {
            let remaining = state.store.flush_dirty().await;
            if remaining < before {
                info!("Persistence retry: {} flushed, {} still pending", before - remaining, remaining);
            } else {
                error!("Persistence retry: {} bookings still failing", remaining);
            }
        }
        sleep(FLUSH_INTERVAL).await;
    }
}
