//! Editor instance driver.
//!
//! One `EditorInstance` owns one editor process end to end: launch, wait
//! for readiness, type the message, press save, settle, close. Instances
//! are single-use and are handed to the writer as `Box<dyn EditorSession>`.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use notelog_core::{Chord, DriverSettings, EditorSession, KeyboardSink, LogError, ReadinessProbe};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::shutdown::{ClosePolicy, close_child};

/// A launched editor bound to one destination file.
///
/// Lifecycle: launched → ready → written (normally once) → closed. After
/// `close` the process handle is released and further writes see no process.
pub struct EditorInstance {
    child: Option<Child>,
    pid: Option<u32>,
    keyboard: Arc<dyn KeyboardSink>,
    settings: Arc<DriverSettings>,
}

impl EditorInstance {
    /// Spawn the editor on `destination` and wait until it accepts input.
    ///
    /// The readiness wait is bounded by the launch timeout when one is set.
    /// A process that fails readiness is killed before the error returns.
    pub async fn launch(
        destination: &Path,
        settings: Arc<DriverSettings>,
        keyboard: Arc<dyn KeyboardSink>,
        probe: &dyn ReadinessProbe,
    ) -> Result<Self, LogError> {
        let mut child = spawn_editor(&settings, destination)?;
        let pid = child
            .id()
            .ok_or_else(|| LogError::ProcessLaunch("editor exited immediately".to_string()))?;

        info!(
            pid,
            program = %settings.editor_program,
            path = %destination.display(),
            "Launched editor"
        );

        let started = Instant::now();
        let ready = match settings.launch_timeout() {
            Some(limit) => timeout(limit, probe.wait_ready(pid))
                .await
                .unwrap_or(Err(LogError::LaunchTimeout(limit))),
            None => probe.wait_ready(pid).await,
        };

        if let Err(err) = ready {
            warn!(pid, %err, "Editor not ready, killing");
            if let Err(e) = child.kill().await {
                warn!(pid, error = %e, "Failed to kill editor after readiness failure");
            }
            return Err(err);
        }

        match child.try_wait() {
            Ok(None) => {}
            Ok(Some(status)) => {
                return Err(LogError::ProcessLaunch(format!(
                    "editor exited before accepting input ({status})"
                )));
            }
            Err(e) => return Err(LogError::Process(e.to_string())),
        }

        debug!(pid, elapsed_ms = started.elapsed().as_millis() as u64, "Editor ready for input");
        Ok(Self::attach(Some(child), settings, keyboard))
    }

    /// Wrap an already-ready child, or no process at all.
    pub(crate) fn attach(
        child: Option<Child>,
        settings: Arc<DriverSettings>,
        keyboard: Arc<dyn KeyboardSink>,
    ) -> Self {
        let pid = child.as_ref().and_then(Child::id);
        Self {
            child,
            pid,
            keyboard,
            settings,
        }
    }

    pub const fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub const fn has_process(&self) -> bool {
        self.child.is_some()
    }
}

#[async_trait]
impl EditorSession for EditorInstance {
    async fn write(&mut self, message: &str) -> Result<(), LogError> {
        if self.child.is_none() {
            if self.settings.fail_on_missing_process {
                return Err(LogError::ProcessLaunch(
                    "session has no editor process".to_string(),
                ));
            }
            debug!("No editor process, skipping write");
            return Ok(());
        }

        if self.settings.seek_end_before_typing {
            self.keyboard.send_chord(&Chord::document_end()).await?;
        }
        self.keyboard.type_text(message).await?;
        self.keyboard.send_chord(&Chord::save()).await?;

        // No save acknowledgement exists; give the editor time to drain input
        let settle = self.settings.settling_delay(message);
        debug!(
            pid = self.pid,
            chars = message.chars().count(),
            settle_ms = settle.as_millis() as u64,
            "Input injected"
        );
        tokio::time::sleep(settle).await;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), LogError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        debug!(pid = self.pid, "Requesting editor close");
        match close_child(&mut child, ClosePolicy::from(&*self.settings)).await {
            Ok(status) => {
                debug!(pid = self.pid, %status, "Editor exited");
                Ok(())
            }
            Err(err) => {
                // Keep the handle so a retry can still reach the process;
                // kill_on_drop reaps it once the session is released.
                self.child = Some(child);
                Err(err)
            }
        }
    }
}

fn spawn_editor(settings: &DriverSettings, destination: &Path) -> Result<Child, LogError> {
    let mut cmd = Command::new(&settings.editor_program);
    cmd.args(&settings.editor_args)
        .arg(destination)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    // Own process group, so a terminal Ctrl+C reaches only the CLI
    #[cfg(unix)]
    cmd.process_group(0);

    cmd.spawn().map_err(|e| {
        LogError::ProcessLaunch(format!("failed to spawn {}: {e}", settings.editor_program))
    })
}
