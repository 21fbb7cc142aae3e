//! Serialized log writer.
//!
//! The public entry point for appending messages. A single gate guarantees
//! at most one editor session exists at any instant; each write opens a
//! fresh session, drives it, and closes it before the gate is released.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::bootstrap::{ensure_log_file, resolve_destination};
use crate::error::LogError;
use crate::ports::SessionFactory;

/// Appends messages to a log file through one editor session per write.
///
/// Safe to share between tasks (`Arc<SerializedWriter>`). Writes are
/// totally ordered by gate acquisition; `tokio::sync::Mutex` hands the gate
/// out in FIFO order, though callers should not rely on it.
pub struct SerializedWriter {
    destination: PathBuf,
    factory: Arc<dyn SessionFactory>,
    gate: Mutex<()>,
    disposed: AtomicBool,
    sessions_started: AtomicU64,
}

impl SerializedWriter {
    /// Resolve `path`, create it with the log header if missing, and return a writer.
    pub fn open(
        path: impl AsRef<Path>,
        factory: Arc<dyn SessionFactory>,
    ) -> Result<Self, LogError> {
        let destination = resolve_destination(path.as_ref())?;
        ensure_log_file(&destination)?;

        Ok(Self {
            destination,
            factory,
            gate: Mutex::new(()),
            disposed: AtomicBool::new(false),
            sessions_started: AtomicU64::new(0),
        })
    }

    /// Absolute path of the destination file.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Number of editor sessions this writer has opened.
    pub fn sessions_started(&self) -> u64 {
        self.sessions_started.load(Ordering::Relaxed)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Append `message` to the log through a fresh editor session.
    ///
    /// The session is always closed before the gate is released. If both the
    /// write and the close fail, the write error is returned.
    pub async fn write(&self, message: &str) -> Result<(), LogError> {
        if self.is_disposed() {
            return Err(LogError::Disposed);
        }

        let _gate = self.gate.lock().await;

        // Disposal may have completed while this caller waited on the gate
        if self.is_disposed() {
            return Err(LogError::Disposed);
        }

        let session_id = self.sessions_started.fetch_add(1, Ordering::Relaxed) + 1;
        let started = Instant::now();
        debug!(session_id, chars = message.chars().count(), "Opening editor session");

        let mut session = self.factory.open(&self.destination).await?;
        let written = session.write(message).await;
        let closed = session.close().await;

        if let (Err(write_err), Err(close_err)) = (&written, &closed) {
            warn!(session_id, %write_err, %close_err, "Session close failed after write error");
        }

        debug!(
            session_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = written.is_ok() && closed.is_ok(),
            "Editor session finished"
        );

        written.and(closed)
    }

    /// Permanently stop accepting writes.
    ///
    /// Waits for any in-flight write to finish. Idempotent.
    pub async fn dispose(&self) {
        let _gate = self.gate.lock().await;
        if !self.disposed.swap(true, Ordering::AcqRel) {
            info!(path = %self.destination.display(), "Log writer disposed");
        }
    }
}
