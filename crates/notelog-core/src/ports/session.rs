//! Editor session ports.
//!
//! An `EditorSession` is one editor process bound to one destination file,
//! alive for a single write. A `SessionFactory` opens sessions; the
//! serialized writer holds one and never sees process details.

use std::path::Path;

use async_trait::async_trait;

use crate::error::LogError;

/// A single launched editor, ready for input.
///
/// Lifecycle: opened (launched and ready) → `write` (normally once) →
/// `close`. Sessions are single-use; `close` must be idempotent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EditorSession: Send {
    /// Type `message` into the document and persist it.
    async fn write(&mut self, message: &str) -> Result<(), LogError>;

    /// Request the editor to close and wait for it to exit.
    async fn close(&mut self) -> Result<(), LogError>;
}

/// Opens editor sessions on a destination file.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Launch an editor on `destination` and wait until it is ready.
    async fn open(&self, destination: &Path) -> Result<Box<dyn EditorSession>, LogError>;
}
