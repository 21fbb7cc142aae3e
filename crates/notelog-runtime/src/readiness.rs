//! Readiness probes: waiting for a launched editor to accept input.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notelog_core::{DriverSettings, LogError, ReadinessProbe};
use tokio::process::Command;
use tracing::debug;

/// Waits a fixed delay. Liveness is checked by the session afterwards.
#[derive(Debug, Clone, Copy)]
pub struct SettleProbe {
    delay: Duration,
}

impl SettleProbe {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReadinessProbe for SettleProbe {
    async fn wait_ready(&self, pid: u32) -> Result<(), LogError> {
        debug!(pid, delay_ms = self.delay.as_millis() as u64, "Waiting for editor to settle");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Waits until the process maps a visible X11 window.
///
/// Runs `xdotool search --sync`, which blocks until a matching window
/// exists. Unbounded on its own; the session applies the launch timeout.
#[derive(Debug, Clone)]
pub struct WindowProbe {
    xdotool: PathBuf,
}

impl WindowProbe {
    pub fn new(xdotool: impl Into<PathBuf>) -> Self {
        Self {
            xdotool: xdotool.into(),
        }
    }
}

#[async_trait]
impl ReadinessProbe for WindowProbe {
    async fn wait_ready(&self, pid: u32) -> Result<(), LogError> {
        debug!(pid, "Waiting for editor window");
        let status = Command::new(&self.xdotool)
            .args(["search", "--sync", "--onlyvisible", "--pid"])
            .arg(pid.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| LogError::Input(format!("failed to run xdotool search: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(LogError::ProcessLaunch(format!(
                "no window found for editor pid {pid} ({status})"
            )))
        }
    }
}

/// The readiness probe for the current platform.
///
/// X11 desktops with `xdotool` get a window probe; everything else waits
/// the configured settle delay.
pub fn platform_probe(settings: &DriverSettings) -> Arc<dyn ReadinessProbe> {
    #[cfg(not(windows))]
    {
        if let Ok(xdotool) = crate::keyboard::locate_xdotool() {
            return Arc::new(WindowProbe::new(xdotool));
        }
    }

    Arc::new(SettleProbe::new(settings.ready_delay()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn settle_probe_waits_full_delay() {
        let probe = SettleProbe::new(Duration::from_millis(500));
        let start = tokio::time::Instant::now();
        probe.wait_ready(1).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn window_probe_failure_is_launch_error() {
        // `false` stands in for an xdotool search that finds nothing
        let probe = WindowProbe::new("false");
        let err = probe.wait_ready(1).await.unwrap_err();
        assert!(matches!(err, LogError::ProcessLaunch(_)));
    }

    #[tokio::test]
    async fn window_probe_missing_binary_is_input_error() {
        let probe = WindowProbe::new("/nonexistent/xdotool");
        let err = probe.wait_ready(1).await.unwrap_err();
        assert!(matches!(err, LogError::Input(_)));
    }
}
