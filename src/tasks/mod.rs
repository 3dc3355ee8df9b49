//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod alerter;
pub mod ticker;
pub mod wake_up_recovery;

// Re-export main functions
pub use alerter::alerter_task;
pub use ticker::ticker_task;
pub use wake_up_recovery::wake_up_recovery_task;
