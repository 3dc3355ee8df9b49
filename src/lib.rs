//! Steep - A wall-clock-accurate countdown timer service
//!
//! This library provides a countdown timer whose remaining time is always
//! recomputed from the wall clock, so it stays accurate across host sleep,
//! event-loop stalls, and missed ticks. While the countdown runs it can hold
//! a keep-awake command open, and on completion it runs an alert command.

pub mod config;
pub mod timer;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use timer::{Countdown, Phase, TimerEvent, TimerSnapshot};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
