//! Countdown engine module
//!
//! This module contains the timer state machine and the wall-clock
//! resynchronization logic the rest of the service is built around.

pub mod countdown;
pub mod event;


// Re-export main types
pub use countdown::{Countdown, PauseOutcome, Phase, ResyncOutcome};
pub use event::{TimerEvent, TimerSnapshot};
