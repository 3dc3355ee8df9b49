//! State management module
//!
//! This module contains the application state wrapping the countdown engine
//! and the side effects its transitions carry out.

pub mod app_state;

// Re-export main types
pub use app_state::{AppState, ToggleOutcome};
