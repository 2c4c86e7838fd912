//! Tick driver background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info};

use crate::state::AppState;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that delivers one tick per elapsed second to the timer
/// while its ticker is active
pub async fn tick_driver_task(state: Arc<AppState>) {
    info!("Starting tick driver task");

    let mut active_rx = state.ticker_activity();

    loop {
        // Wait for the ticker to be switched on
        if !*active_rx.borrow_and_update() {
            if active_rx.changed().await.is_err() {
                info!("Ticker channel closed, stopping tick driver");
                return;
            }
            continue;
        }

        debug!("Ticker active, counting down");
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

        loop {
            tokio::select! {
                // Timer tick - one second elapsed
                _ = interval.tick() => {
                    match state.tick() {
                        Ok(Some(finished)) => debug!("Tick completed {} session", finished),
                        Ok(None) => {}
                        Err(e) => error!("Failed to tick timer: {}", e),
                    }
                }

                // Activation change - stop counting or restart the second
                changed = active_rx.changed() => {
                    if changed.is_err() {
                        info!("Ticker channel closed, stopping tick driver");
                        return;
                    }
                    if *active_rx.borrow_and_update() {
                        // Stopped and restarted between polls: begin a fresh second
                        interval.reset();
                    } else {
                        debug!("Ticker stopped");
                        break;
                    }
                }
            }
        }
    }
}
