//! Destination file bootstrap.
//!
//! The editor only appends to a log document when the file starts with the
//! `.LOG` marker line, so a missing destination is created with that header
//! before any session opens it. Existing files are left untouched.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::LogError;

/// Always-append marker written to a fresh destination file.
pub const LOG_HEADER: &[u8] = b".LOG\r\n";

/// Outcome of [`ensure_log_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// The file was missing and has been created with [`LOG_HEADER`].
    Created,
    /// The file already existed; its bytes were not touched.
    Existing,
}

/// Resolve `path` to an absolute path without touching the filesystem.
pub fn resolve_destination(path: &Path) -> Result<PathBuf, LogError> {
    std::path::absolute(path).map_err(|e| LogError::io(path, e))
}

/// Create `path` with the log header if nothing exists there yet.
///
/// Creation uses `create_new`, so two racing bootstraps never both write
/// the header and an existing file is never truncated.
pub fn ensure_log_file(path: &Path) -> Result<Bootstrap, LogError> {
    let file = OpenOptions::new().write(true).create_new(true).open(path);

    match file {
        Ok(mut file) => {
            file.write_all(LOG_HEADER)
                .and_then(|()| file.flush())
                .map_err(|e| LogError::io(path, e))?;
            info!(path = %path.display(), "Created log file with append marker");
            Ok(Bootstrap::Created)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "Log file already exists");
            Ok(Bootstrap::Existing)
        }
        Err(e) => Err(LogError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_header_on_fresh_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");

        assert_eq!(ensure_log_file(&path).unwrap(), Bootstrap::Created);
        assert_eq!(std::fs::read(&path).unwrap(), b".LOG\r\n");
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 6);
    }

    #[test]
    fn test_second_bootstrap_leaves_bytes_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        ensure_log_file(&path).unwrap();
        std::fs::write(&path, b".LOG\r\nfirst entry").unwrap();

        assert_eq!(ensure_log_file(&path).unwrap(), Bootstrap::Existing);
        assert_eq!(std::fs::read(&path).unwrap(), b".LOG\r\nfirst entry");
    }

    #[test]
    fn test_existing_non_log_file_is_not_validated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"shopping list").unwrap();

        assert_eq!(ensure_log_file(&path).unwrap(), Bootstrap::Existing);
        assert_eq!(std::fs::read(&path).unwrap(), b"shopping list");
    }

    #[test]
    fn test_missing_parent_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("log.txt");

        let err = ensure_log_file(&path).unwrap_err();
        assert!(matches!(err, LogError::Io { .. }));
    }

    #[test]
    fn test_relative_path_resolves_against_cwd() {
        let resolved = resolve_destination(Path::new("log.txt")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("log.txt"));
    }
}
