//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::services::KeepAwake;
use crate::timer::{Countdown, PauseOutcome, Phase, ResyncOutcome, TimerEvent, TimerSnapshot};
use crate::utils::{format_compact_duration, format_mmss, now_epoch_ms};

/// What a toggle request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    Paused,
    Completed,
    Ignored,
}

/// Main application state wrapping the countdown engine.
///
/// All transitions go through here: each method performs the engine
/// transition under the lock, then carries out the side effects the
/// transition requires (keep-awake acquire/release, event broadcast,
/// snapshot publication) before returning.
pub struct AppState {
    /// Countdown engine state
    pub countdown: Arc<Mutex<Countdown>>,
    /// Last committed duration setting (minutes, seconds), re-read on reset
    pub configured_duration: Arc<Mutex<(i64, i64)>>,
    /// Keep-awake capability held while the countdown runs
    pub keep_awake: Arc<dyn KeepAwake>,
    /// Resync cadence for the ticker task
    pub tick_interval_ms: u64,
    /// Optional command run when the countdown completes
    pub alert_command: Option<String>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for discrete transition events
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Channel for continuously updated snapshots
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState with the configured initial duration applied
    pub fn new(config: &Config, keep_awake: Arc<dyn KeepAwake>) -> Self {
        let minutes = config.minutes as i64;
        let seconds = config.seconds as i64;

        let mut countdown = Countdown::new();
        countdown.set_duration(minutes, seconds);

        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(countdown.snapshot());

        Self {
            countdown: Arc::new(Mutex::new(countdown)),
            configured_duration: Arc::new(Mutex::new((minutes, seconds))),
            keep_awake,
            tick_interval_ms: config.tick_ms,
            alert_command: config.alert_command.clone(),
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Run an engine transition under the lock and return its outcome
    /// together with the snapshot taken right after it
    fn update_countdown<T, F>(&self, updater: F) -> Result<(T, TimerSnapshot), String>
    where
        F: FnOnce(&mut Countdown) -> T,
    {
        let mut countdown = self.lock_countdown()?;
        let outcome = updater(&mut *countdown);
        let snapshot = countdown.snapshot();
        drop(countdown); // Release the lock before the caller's side effects

        Ok((outcome, snapshot))
    }

    fn lock_countdown(&self) -> Result<MutexGuard<'_, Countdown>, String> {
        self.countdown
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))
    }

    /// Apply a new countdown duration. Acknowledged but ignored while running.
    pub fn set_duration(&self, minutes: i64, seconds: i64) -> Result<(bool, TimerSnapshot), String> {
        let (applied, snapshot) =
            self.update_countdown(|countdown| countdown.set_duration(minutes, seconds))?;

        if applied {
            self.remember_duration(minutes, seconds)?;
            info!("Duration set to {}", format_mmss(snapshot.total_seconds));
            self.record_action("duration");
            self.emit(TimerEvent::DurationSet {
                snapshot: snapshot.clone(),
            });
            self.publish(&snapshot);
        } else {
            debug!("Duration change ignored while the countdown is running");
        }

        Ok((applied, snapshot))
    }

    /// Apply a whole-minute preset duration. Acknowledged but ignored while running.
    pub fn apply_preset(&self, minutes: i64) -> Result<(bool, TimerSnapshot), String> {
        self.set_duration(minutes, 0)
    }

    /// Start or resume the countdown from the current wall clock
    pub fn start(&self) -> Result<(bool, TimerSnapshot), String> {
        let now_ms = now_epoch_ms();
        let (started, snapshot) = self.update_countdown(|countdown| countdown.start(now_ms))?;

        if started {
            info!(
                "Countdown started with {} on the clock",
                format_mmss(snapshot.remaining_seconds)
            );
            // Best effort: a failed acquisition never blocks the countdown
            if let Err(e) = self.keep_awake.acquire() {
                warn!("Keep-awake acquisition failed, continuing without it: {}", e);
            }
            self.record_action("start");
            self.emit(TimerEvent::Started {
                snapshot: snapshot.clone(),
            });
            self.publish(&snapshot);
        } else {
            debug!("Start request ignored in phase {:?}", snapshot.phase);
        }

        Ok((started, snapshot))
    }

    /// Pause the countdown, banking the elapsed run time
    pub fn pause(&self) -> Result<(PauseOutcome, TimerSnapshot), String> {
        let now_ms = now_epoch_ms();
        let (outcome, snapshot) = self.update_countdown(|countdown| countdown.pause(now_ms))?;

        match outcome {
            PauseOutcome::Paused => {
                info!(
                    "Countdown paused with {} remaining",
                    format_mmss(snapshot.remaining_seconds)
                );
                self.keep_awake.release();
                self.record_action("pause");
                self.emit(TimerEvent::Paused {
                    snapshot: snapshot.clone(),
                });
                self.publish(&snapshot);
            }
            PauseOutcome::Completed => {
                // Deadline already passed; completion wins over pausing
                self.record_action("pause");
                self.complete(&snapshot);
            }
            PauseOutcome::Ignored => {
                debug!("Pause request ignored in phase {:?}", snapshot.phase);
            }
        }

        Ok((outcome, snapshot))
    }

    /// Pause when running, start otherwise (single-button control)
    pub fn toggle(&self) -> Result<(ToggleOutcome, TimerSnapshot), String> {
        let running = self.get_snapshot()?.phase == Phase::Running;

        if running {
            let (outcome, snapshot) = self.pause()?;
            let outcome = match outcome {
                PauseOutcome::Paused => ToggleOutcome::Paused,
                PauseOutcome::Completed => ToggleOutcome::Completed,
                // A stop or completion raced in between; nothing to do
                PauseOutcome::Ignored => ToggleOutcome::Ignored,
            };
            Ok((outcome, snapshot))
        } else {
            let (started, snapshot) = self.start()?;
            let outcome = if started {
                ToggleOutcome::Started
            } else {
                ToggleOutcome::Ignored
            };
            Ok((outcome, snapshot))
        }
    }

    /// Stop the countdown and rewind to the configured duration
    pub fn stop(&self) -> Result<TimerSnapshot, String> {
        let ((), snapshot) = self.update_countdown(|countdown| countdown.stop())?;

        info!(
            "Countdown stopped, rewound to {}",
            format_mmss(snapshot.remaining_seconds)
        );
        self.keep_awake.release();
        self.record_action("stop");
        self.emit(TimerEvent::Stopped {
            snapshot: snapshot.clone(),
        });
        self.publish(&snapshot);
        Ok(snapshot)
    }

    /// Stop, then re-apply the last committed duration setting
    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        let (minutes, seconds) = self.get_configured_duration()?;
        let ((), snapshot) =
            self.update_countdown(|countdown| countdown.reset(minutes, seconds))?;

        info!("Countdown reset to {}", format_mmss(snapshot.total_seconds));
        self.keep_awake.release();
        self.record_action("reset");
        self.emit(TimerEvent::Reset {
            snapshot: snapshot.clone(),
        });
        self.publish(&snapshot);
        Ok(snapshot)
    }

    /// Recompute remaining time from the current wall clock
    pub fn resync(&self) -> Result<(ResyncOutcome, TimerSnapshot), String> {
        self.resync_at(now_epoch_ms())
    }

    /// Recompute remaining time as of `now_ms`
    pub fn resync_at(&self, now_ms: u64) -> Result<(ResyncOutcome, TimerSnapshot), String> {
        let (outcome, snapshot) = self.update_countdown(|countdown| countdown.resync(now_ms))?;

        match outcome {
            ResyncOutcome::Ticking => self.publish(&snapshot),
            ResyncOutcome::Completed => self.complete(&snapshot),
            ResyncOutcome::Inactive => {}
        }

        Ok((outcome, snapshot))
    }

    /// One-shot completion side effects, shared by resync and by a pause
    /// that discovers the deadline already passed
    fn complete(&self, snapshot: &TimerSnapshot) {
        info!("Countdown completed");
        self.keep_awake.release();
        self.emit(TimerEvent::Completed {
            snapshot: snapshot.clone(),
        });
        self.publish(snapshot);
    }

    /// Get the current countdown snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.lock_countdown().map(|countdown| countdown.snapshot())
    }

    /// Get the last committed duration setting
    pub fn get_configured_duration(&self) -> Result<(i64, i64), String> {
        self.configured_duration
            .lock()
            .map(|setting| *setting)
            .map_err(|e| format!("Failed to lock duration setting: {}", e))
    }

    fn remember_duration(&self, minutes: i64, seconds: i64) -> Result<(), String> {
        let mut setting = self
            .configured_duration
            .lock()
            .map_err(|e| format!("Failed to lock duration setting: {}", e))?;
        *setting = (minutes.max(0), seconds.max(0));
        Ok(())
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Broadcast a discrete transition event to background tasks
    fn emit(&self, event: TimerEvent) {
        if let Err(e) = self.event_tx.send(event) {
            warn!("Failed to send timer event: {}", e);
        }
    }

    /// Publish the latest snapshot on the watch channel
    fn publish(&self, snapshot: &TimerSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to send snapshot update: {}", e);
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_compact_duration(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
