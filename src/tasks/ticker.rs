//! Ticker background task

use std::{sync::Arc, time::Duration};

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::state::AppState;
use crate::timer::{Phase, ResyncOutcome, TimerEvent};

/// Background task that resyncs the countdown on a fixed cadence while
/// it is running, so the published snapshot tracks the wall clock.
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting ticker task");

    let mut event_rx = state.event_tx.subscribe();
    let tick_interval = Duration::from_millis(state.tick_interval_ms);

    loop {
        // Sleep until the countdown starts running
        let should_tick = match event_rx.recv().await {
            Ok(TimerEvent::Started { .. }) => true,
            Ok(_) => false,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Ticker lagged behind, skipped {} events", skipped);
                still_running(&state)
            }
            Err(RecvError::Closed) => {
                warn!("Event channel closed, stopping ticker task");
                break;
            }
        };

        if !should_tick {
            continue;
        }

        debug!(
            "Countdown running, resyncing every {}ms",
            state.tick_interval_ms
        );
        let mut interval = tokio::time::interval(tick_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match state.resync() {
                        Ok((ResyncOutcome::Ticking, _)) => {}
                        Ok((ResyncOutcome::Completed, _)) => {
                            debug!("Countdown completed, ticker going back to sleep");
                            break;
                        }
                        Ok((ResyncOutcome::Inactive, _)) => {
                            debug!("Countdown no longer running, ticker going back to sleep");
                            break;
                        }
                        Err(e) => {
                            error!("Failed to resync countdown: {}", e);
                            break;
                        }
                    }
                }

                event = event_rx.recv() => {
                    match event {
                        Ok(event) => {
                            if event.snapshot().phase != Phase::Running {
                                debug!(
                                    "Countdown left the running phase ({}), ticker going back to sleep",
                                    event.name()
                                );
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Ticker lagged behind, skipped {} events", skipped);
                            if !still_running(&state) {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => {
                            warn!("Event channel closed, stopping ticker task");
                            return;
                        }
                    }
                }
            }
        }
    }
}

fn still_running(state: &AppState) -> bool {
    state
        .get_snapshot()
        .map(|snapshot| snapshot.phase == Phase::Running)
        .unwrap_or(false)
}
