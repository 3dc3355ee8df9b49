//! External side-effect module
//!
//! This module contains the keep-awake backends held while the countdown
//! runs and the alert command executed on completion.

pub mod alert;
pub mod keep_awake;

// Re-export main functions
pub use alert::run_alert_command;
pub use keep_awake::{keep_awake_from_config, CommandKeepAwake, KeepAwake, NoopKeepAwake};
