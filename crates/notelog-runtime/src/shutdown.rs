//! Graceful editor shutdown: close request, bounded wait, optional forced kill.
//!
//! # Strategy
//! 1. Ask the editor to close its window (Unix: SIGTERM, Windows: `taskkill`
//!    without `/F`, which posts a close message)
//! 2. Wait for exit, forever or up to the configured close timeout
//! 3. On timeout, either force-kill and reap, or report `CloseTimeout`

use std::process::ExitStatus;
#[cfg(windows)]
use std::process::Stdio;
use std::time::Duration;

use notelog_core::{DriverSettings, LogError};
use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, warn};

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// How long to wait for an editor to exit after the close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClosePolicy {
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Force-kill on timeout instead of returning `CloseTimeout`.
    pub kill_on_timeout: bool,
}

impl From<&DriverSettings> for ClosePolicy {
    fn from(settings: &DriverSettings) -> Self {
        Self {
            timeout: settings.close_timeout(),
            kill_on_timeout: settings.kill_on_close_timeout,
        }
    }
}

/// Close an editor process and wait for it to exit.
///
/// Returns the exit status once the process has been reaped. On
/// `CloseTimeout` the child is still running and still owned by the caller.
pub async fn close_child(child: &mut Child, policy: ClosePolicy) -> Result<ExitStatus, LogError> {
    if let Some(status) = child.try_wait().map_err(process_error)? {
        debug!(%status, "Editor already exited before close request");
        return Ok(status);
    }

    let Some(pid) = child.id() else {
        return child.wait().await.map_err(process_error);
    };

    request_close(pid).await?;

    let Some(limit) = policy.timeout else {
        return child.wait().await.map_err(process_error);
    };

    match timeout(limit, child.wait()).await {
        Ok(result) => result.map_err(process_error),
        Err(_) if policy.kill_on_timeout => {
            warn!(
                pid,
                timeout_ms = limit.as_millis() as u64,
                "Editor ignored close request, killing"
            );
            child.kill().await.map_err(process_error)?;
            child.wait().await.map_err(process_error)
        }
        Err(_) => Err(LogError::CloseTimeout(limit)),
    }
}

#[cfg(unix)]
async fn request_close(pid: u32) -> Result<(), LogError> {
    let raw = i32::try_from(pid).map_err(|_| LogError::Process(format!("pid {pid} out of range")))?;
    match signal::kill(Pid::from_raw(raw), Signal::SIGTERM) {
        // Exited between the liveness check and the signal
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(LogError::Process(format!("SIGTERM to {pid} failed: {e}"))),
    }
}

#[cfg(windows)]
async fn request_close(pid: u32) -> Result<(), LogError> {
    let status = tokio::process::Command::new("taskkill")
        .arg("/PID")
        .arg(pid.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| LogError::Process(format!("taskkill failed to start: {e}")))?;

    if !status.success() {
        // Usually the window is already gone; the exit wait settles it
        debug!(pid, %status, "taskkill reported failure");
    }
    Ok(())
}

fn process_error(err: std::io::Error) -> LogError {
    LogError::Process(err.to_string())
}
