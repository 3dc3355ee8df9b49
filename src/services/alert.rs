//! Completion alert command execution

use tokio::process::Command;
use tracing::info;

/// Run the configured alert command through the shell and wait for it.
///
/// Returns an error when the command cannot be spawned or exits non-zero.
pub async fn run_alert_command(command: &str) -> Result<(), String> {
    info!("Running alert command: {}", command);

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .await
        .map_err(|e| format!("Failed to execute alert command: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("Alert command failed: {}", stderr.trim()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn succeeding_command_is_ok() {
        assert!(run_alert_command("true").await.is_ok());
    }

    #[tokio::test]
    async fn failing_command_reports_an_error() {
        let result = run_alert_command("echo boom >&2; exit 3").await;

        let error = result.unwrap_err();
        assert!(error.contains("boom"));
    }
}
