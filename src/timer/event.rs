//! Snapshots and transition events

use serde::{Deserialize, Serialize};

use super::countdown::Phase;

/// Point-in-time view of the countdown, published on the watch channel after
/// every state-affecting operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub progress_percent: f64,
}

/// Discrete transition events broadcast to background tasks and integrations.
///
/// Progress between transitions travels on the watch channel instead; the
/// broadcast channel only carries the transitions themselves. `Completed`
/// fires exactly once per run to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    DurationSet { snapshot: TimerSnapshot },
    Started { snapshot: TimerSnapshot },
    Paused { snapshot: TimerSnapshot },
    Stopped { snapshot: TimerSnapshot },
    Reset { snapshot: TimerSnapshot },
    Completed { snapshot: TimerSnapshot },
}

impl TimerEvent {
    /// The snapshot taken right after the transition this event reports
    pub fn snapshot(&self) -> &TimerSnapshot {
        match self {
            TimerEvent::DurationSet { snapshot }
            | TimerEvent::Started { snapshot }
            | TimerEvent::Paused { snapshot }
            | TimerEvent::Stopped { snapshot }
            | TimerEvent::Reset { snapshot }
            | TimerEvent::Completed { snapshot } => snapshot,
        }
    }

    /// Short event name for logs
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::DurationSet { .. } => "duration_set",
            TimerEvent::Started { .. } => "started",
            TimerEvent::Paused { .. } => "paused",
            TimerEvent::Stopped { .. } => "stopped",
            TimerEvent::Reset { .. } => "reset",
            TimerEvent::Completed { .. } => "completed",
        }
    }
}
