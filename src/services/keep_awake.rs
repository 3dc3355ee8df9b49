//! Keep-awake capability held while the countdown runs

use std::sync::{Arc, Mutex};

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// A capability that keeps the host awake while held.
///
/// Acquire is idempotent while held; release is idempotent when not held.
pub trait KeepAwake: Send + Sync {
    fn acquire(&self) -> Result<(), String>;
    fn release(&self);
}

/// Keep-awake backend that does nothing. Used when no command is configured.
pub struct NoopKeepAwake;

impl KeepAwake for NoopKeepAwake {
    fn acquire(&self) -> Result<(), String> {
        debug!("No keep-awake command configured, nothing to acquire");
        Ok(())
    }

    fn release(&self) {
        debug!("No keep-awake command configured, nothing to release");
    }
}

/// Keep-awake backend that holds a long-running shell command
/// (e.g. `systemd-inhibit sleep infinity` or `caffeinate`) while acquired.
pub struct CommandKeepAwake {
    command: String,
    child: Mutex<Option<Child>>,
}

impl CommandKeepAwake {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            child: Mutex::new(None),
        }
    }
}

impl KeepAwake for CommandKeepAwake {
    fn acquire(&self) -> Result<(), String> {
        let mut child = self
            .child
            .lock()
            .map_err(|e| format!("Failed to lock keep-awake handle: {}", e))?;

        if child.is_some() {
            debug!("Keep-awake already held");
            return Ok(());
        }

        let spawned = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to spawn keep-awake command: {}", e))?;

        info!("Keep-awake acquired via command: {}", self.command);
        *child = Some(spawned);
        Ok(())
    }

    fn release(&self) {
        let mut child = match self.child.lock() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to lock keep-awake handle: {}", e);
                return;
            }
        };

        if let Some(mut held) = child.take() {
            if let Err(e) = held.start_kill() {
                warn!("Failed to stop keep-awake command: {}", e);
            } else {
                info!("Keep-awake released");
            }
        }
    }
}

/// Pick the keep-awake backend for the configured command, if any
pub fn keep_awake_from_config(command: Option<&str>) -> Arc<dyn KeepAwake> {
    match command {
        Some(command) if !command.trim().is_empty() => {
            info!("Keep-awake command: {}", command);
            Arc::new(CommandKeepAwake::new(command))
        }
        _ => {
            info!("No keep-awake command configured, running without one");
            Arc::new(NoopKeepAwake)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_backend_acquires_and_releases() {
        let keep_awake = NoopKeepAwake;
        assert!(keep_awake.acquire().is_ok());
        keep_awake.release();
    }

    #[tokio::test]
    async fn command_backend_acquire_is_idempotent() {
        let keep_awake = CommandKeepAwake::new("sleep 30");

        assert!(keep_awake.acquire().is_ok());
        assert!(keep_awake.acquire().is_ok());

        keep_awake.release();
    }

    #[tokio::test]
    async fn command_backend_release_without_acquire_is_a_noop() {
        let keep_awake = CommandKeepAwake::new("sleep 30");
        keep_awake.release();
        keep_awake.release();
    }

    #[test]
    fn config_without_a_command_selects_the_noop_backend() {
        let keep_awake = keep_awake_from_config(None);
        assert!(keep_awake.acquire().is_ok());

        let keep_awake = keep_awake_from_config(Some("   "));
        assert!(keep_awake.acquire().is_ok());
    }
}
