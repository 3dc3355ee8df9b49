//! Countdown state machine and wall-clock resynchronization
//!
//! The engine is pure and synchronous: every time-dependent operation takes
//! the current wall-clock time in epoch milliseconds as an argument, and
//! remaining time is always recomputed from those timestamps instead of being
//! decremented per tick. Any number of delayed or skipped ticks self-corrects
//! on the next call.

use serde::{Deserialize, Serialize};

use super::event::TimerSnapshot;

/// Phase of the countdown lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Completed,
}

impl Phase {
    /// Stable string form used in API responses and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Completed => "completed",
        }
    }
}

/// Outcome of a pause request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The countdown was running and is now paused
    Paused,
    /// The deadline had already passed, so the run completed instead
    Completed,
    /// The countdown was not running; nothing changed
    Ignored,
}

/// Outcome of a wall-clock resynchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResyncOutcome {
    /// Remaining time was recomputed and the countdown keeps running
    Ticking,
    /// The deadline passed and the run completed
    Completed,
    /// The countdown was not running; nothing changed
    Inactive,
}

/// Countdown timer state machine
///
/// `remaining_seconds` always equals `total_seconds` minus the whole seconds
/// elapsed in the current run segment minus `consumed_seconds`, clamped at
/// zero. `consumed_seconds` banks the run time spent in earlier segments,
/// floored per segment when each one ends. `started_at_ms` is set exactly
/// while the phase is `Running`.
#[derive(Debug, Clone)]
pub struct Countdown {
    total_seconds: u64,
    remaining_seconds: u64,
    phase: Phase,
    started_at_ms: Option<u64>,
    consumed_seconds: u64,
}

impl Countdown {
    /// Create a countdown with no duration configured
    pub fn new() -> Self {
        Self {
            total_seconds: 0,
            remaining_seconds: 0,
            phase: Phase::Idle,
            started_at_ms: None,
            consumed_seconds: 0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Configured duration in seconds
    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    /// Seconds left on the clock as of the last recomputation
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Apply a new duration. Negative inputs silently clamp to zero.
    ///
    /// Returns `false` without touching anything while the countdown is
    /// running; duration changes are only permitted outside `Running`.
    pub fn set_duration(&mut self, minutes: i64, seconds: i64) -> bool {
        if self.phase == Phase::Running {
            return false;
        }

        let minutes = minutes.max(0) as u64;
        let seconds = seconds.max(0) as u64;

        self.total_seconds = minutes.saturating_mul(60).saturating_add(seconds);
        self.remaining_seconds = self.total_seconds;
        self.consumed_seconds = 0;
        self.started_at_ms = None;
        self.phase = Phase::Idle;
        true
    }

    /// Start or resume the countdown at `now_ms`.
    ///
    /// After a run to zero the countdown re-arms from the configured
    /// duration. Returns `false` when already running or when there is
    /// nothing to count down.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.phase == Phase::Running {
            return false;
        }

        // Re-arm from the configured duration after a completed run
        if self.remaining_seconds == 0 {
            self.remaining_seconds = self.total_seconds;
            self.consumed_seconds = 0;
        }

        if self.remaining_seconds == 0 {
            return false;
        }

        self.phase = Phase::Running;
        self.started_at_ms = Some(now_ms);
        true
    }

    /// Pause the countdown at `now_ms`, banking the finished run segment.
    ///
    /// Remaining time is refreshed from the wall clock first, so the pause
    /// observes the same value a resync at `now_ms` would have produced. A
    /// pause that discovers the deadline already passed completes the run
    /// instead of stranding a finished countdown in `Paused`.
    pub fn pause(&mut self, now_ms: u64) -> PauseOutcome {
        if self.phase != Phase::Running {
            return PauseOutcome::Ignored;
        }

        let consumed = self
            .consumed_seconds
            .saturating_add(self.segment_elapsed_seconds(now_ms));
        if consumed >= self.total_seconds {
            self.finish();
            return PauseOutcome::Completed;
        }

        self.consumed_seconds = consumed;
        self.remaining_seconds = self.total_seconds - consumed;
        self.started_at_ms = None;
        self.phase = Phase::Paused;
        PauseOutcome::Paused
    }

    /// Stop the countdown and rewind to the configured duration
    pub fn stop(&mut self) {
        self.remaining_seconds = self.total_seconds;
        self.consumed_seconds = 0;
        self.started_at_ms = None;
        self.phase = Phase::Idle;
    }

    /// Stop, then apply the given duration
    pub fn reset(&mut self, minutes: i64, seconds: i64) {
        self.stop();
        self.set_duration(minutes, seconds);
    }

    /// Recompute remaining time from the wall clock at `now_ms`.
    ///
    /// This is the accuracy-bearing operation: the periodic tick only decides
    /// when it runs, never what it computes, so a host that throttles or
    /// suspends the tick cannot drift the countdown. Completion is reported
    /// exactly once per run to zero; later calls are inactive no-ops.
    pub fn resync(&mut self, now_ms: u64) -> ResyncOutcome {
        if self.phase != Phase::Running {
            return ResyncOutcome::Inactive;
        }

        let consumed = self
            .consumed_seconds
            .saturating_add(self.segment_elapsed_seconds(now_ms));
        if consumed >= self.total_seconds {
            self.finish();
            return ResyncOutcome::Completed;
        }

        self.remaining_seconds = self.total_seconds - consumed;
        ResyncOutcome::Ticking
    }

    /// Progress through the configured duration as a percentage.
    /// Always derived from remaining time, never stored independently.
    pub fn progress_percent(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (self.total_seconds - self.remaining_seconds) as f64 / self.total_seconds as f64 * 100.0
    }

    /// Point-in-time view of the countdown
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            total_seconds: self.total_seconds,
            remaining_seconds: self.remaining_seconds,
            progress_percent: self.progress_percent(),
        }
    }

    /// Whole seconds elapsed in the current run segment. A backwards
    /// wall-clock step clamps to zero rather than inflating remaining time.
    fn segment_elapsed_seconds(&self, now_ms: u64) -> u64 {
        match self.started_at_ms {
            Some(started_at_ms) => now_ms.saturating_sub(started_at_ms) / 1000,
            None => 0,
        }
    }

    fn finish(&mut self) {
        self.consumed_seconds = self.total_seconds;
        self.remaining_seconds = 0;
        self.started_at_ms = None;
        self.phase = Phase::Completed;
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
