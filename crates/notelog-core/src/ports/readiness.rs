//! Readiness probe port.
//!
//! A freshly spawned editor cannot take keyboard input until its window is
//! up. The probe blocks until the process with the given PID is ready.
//! Timeouts are applied by the caller, not the probe.

use async_trait::async_trait;

use crate::error::LogError;

/// Waits until a launched editor process is ready to receive input.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Block until the process identified by `pid` accepts input.
    async fn wait_ready(&self, pid: u32) -> Result<(), LogError>;
}
