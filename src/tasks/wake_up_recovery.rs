//! Wake-up recovery background task

use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tracing::{info, warn};

use crate::state::AppState;
use crate::utils::now_epoch_ms;

const HEARTBEAT: Duration = Duration::from_secs(1);

/// A heartbeat gap larger than this means the process was not scheduled
/// for a while, usually because the host was asleep.
const JUMP_THRESHOLD_MS: u64 = 5_000;

/// Background task that checks for system wake-up and resynchronizes the
/// countdown after it.
///
/// The countdown itself never drifts across a suspend since remaining time
/// is recomputed from the wall clock, but without this task a countdown
/// that expired while the host slept would only complete on the next user
/// request or ticker pass. Detecting the jump forces the resync immediately.
pub async fn wake_up_recovery_task(state: Arc<AppState>) {
    info!("Starting wake-up recovery task");

    let mut interval = interval(HEARTBEAT);
    let mut last_seen = now_epoch_ms();

    loop {
        interval.tick().await;

        let now_ms = now_epoch_ms();
        let drift = now_ms.saturating_sub(last_seen);
        last_seen = now_ms;

        if drift < JUMP_THRESHOLD_MS {
            continue;
        }

        info!(
            "System wake-up detected ({}ms wall-clock jump), resynchronizing",
            drift
        );
        if let Err(e) = state.resync_at(now_ms) {
            warn!("Failed to resync after wake-up: {}", e);
        }
    }
}
