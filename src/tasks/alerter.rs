//! Alerter background task

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::services::run_alert_command;
use crate::state::AppState;
use crate::timer::TimerEvent;
use crate::utils::format_mmss;

/// Background task that runs the configured alert command whenever
/// the countdown completes.
pub async fn alerter_task(state: Arc<AppState>) {
    info!("Starting alerter task");

    let mut event_rx = state.event_tx.subscribe();

    loop {
        match event_rx.recv().await {
            Ok(TimerEvent::Completed { snapshot }) => {
                info!(
                    "Countdown completed after {}",
                    format_mmss(snapshot.total_seconds)
                );
                match state.alert_command.as_deref() {
                    Some(command) => {
                        if let Err(e) = run_alert_command(command).await {
                            error!("Failed to run alert command: {}", e);
                        }
                    }
                    None => debug!("No alert command configured, skipping alert"),
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Alerter lagged behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                warn!("Event channel closed, stopping alerter task");
                break;
            }
        }
    }
}
