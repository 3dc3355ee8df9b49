//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::error;

use crate::{
    services::run_alert_command,
    state::{AppState, ToggleOutcome},
    timer::{PauseOutcome, Phase, ResyncOutcome},
    utils::format_mmss,
};
use super::responses::{ApiResponse, StatusResponse, HealthResponse};

/// Request body for POST /duration. Missing fields default to zero.
#[derive(Debug, Deserialize)]
pub struct DurationRequest {
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub seconds: i64,
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok((started, snapshot)) => {
            let message = if started {
                "Countdown started"
            } else if snapshot.phase == Phase::Running {
                "Countdown already running"
            } else {
                "Nothing to count down, no duration configured"
            };
            Ok(Json(ApiResponse::for_phase(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause() {
        Ok((outcome, snapshot)) => {
            let message = match outcome {
                PauseOutcome::Paused => "Countdown paused",
                PauseOutcome::Completed => "Countdown completed",
                PauseOutcome::Ignored => "Pause ignored, countdown not running",
            };
            Ok(Json(ApiResponse::for_phase(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to pause countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /toggle - Pause when running, start otherwise
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle() {
        Ok((outcome, snapshot)) => {
            let message = match outcome {
                ToggleOutcome::Started => "Countdown started",
                ToggleOutcome::Paused => "Countdown paused",
                ToggleOutcome::Completed => "Countdown completed",
                ToggleOutcome::Ignored => "Toggle ignored, nothing to count down",
            };
            Ok(Json(ApiResponse::for_phase(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to toggle countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Stop and rewind to the configured duration
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop() {
        Ok(snapshot) => Ok(Json(ApiResponse::for_phase(
            "Countdown stopped".to_string(),
            snapshot,
        ))),
        Err(e) => {
            error!("Failed to stop countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Stop and re-apply the configured duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(snapshot) => Ok(Json(ApiResponse::for_phase(
            "Countdown reset".to_string(),
            snapshot,
        ))),
        Err(e) => {
            error!("Failed to reset countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /resync - Recompute remaining time from the wall clock
pub async fn resync_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.resync() {
        Ok((outcome, snapshot)) => {
            let message = match outcome {
                ResyncOutcome::Ticking => "Countdown resynchronized",
                ResyncOutcome::Completed => "Countdown completed",
                ResyncOutcome::Inactive => "Resync ignored, countdown not running",
            };
            Ok(Json(ApiResponse::for_phase(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to resync countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /duration - Set the countdown duration
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.set_duration(request.minutes, request.seconds) {
        Ok((applied, snapshot)) => {
            let message = if applied {
                format!("Duration set to {}", format_mmss(snapshot.total_seconds))
            } else {
                "Duration change ignored while the countdown is running".to_string()
            };
            Ok(Json(ApiResponse::for_phase(message, snapshot)))
        }
        Err(e) => {
            error!("Failed to set duration: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /preset/:minutes - Set a whole-minute preset duration
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Path(minutes): Path<i64>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.apply_preset(minutes) {
        Ok((applied, snapshot)) => {
            let message = if applied {
                format!(
                    "Preset applied, duration set to {}",
                    format_mmss(snapshot.total_seconds)
                )
            } else {
                "Preset ignored while the countdown is running".to_string()
            };
            Ok(Json(ApiResponse::for_phase(message, snapshot)))
        }
        Err(e) => {
            error!("Failed to apply preset: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /alert/test - Run the configured alert command once
pub async fn alert_test_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let snapshot = match state.get_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to get countdown snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let command = match state.alert_command.as_deref() {
        Some(command) => command,
        None => {
            return Ok(Json(ApiResponse::for_phase(
                "No alert command configured".to_string(),
                snapshot,
            )));
        }
    };

    match run_alert_command(command).await {
        Ok(()) => Ok(Json(ApiResponse::for_phase(
            "Alert test triggered".to_string(),
            snapshot,
        ))),
        Err(e) => {
            error!("Alert test failed: {}", e);
            Ok(Json(ApiResponse::error(
                format!("Alert test failed: {}", e),
                snapshot,
            )))
        }
    }
}

/// Handle GET /status - Check current status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.get_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to get countdown snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let (configured_minutes, configured_seconds) = match state.get_configured_duration() {
        Ok(setting) => setting,
        Err(e) => {
            error!("Failed to get duration setting: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        display: format_mmss(snapshot.remaining_seconds),
        timer: snapshot,
        configured_minutes,
        configured_seconds,
        tick_interval_ms: state.tick_interval_ms,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
