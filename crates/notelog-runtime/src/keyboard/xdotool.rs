//! Keyboard injection on X11 desktops through the `xdotool` binary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use notelog_core::{Chord, KeyboardSink, LogError};
use tokio::process::Command;
use tracing::debug;

/// Delay between synthetic keystrokes passed to `xdotool type`.
pub const DEFAULT_TYPE_DELAY_MS: u64 = 12;

/// `KeyboardSink` backed by `xdotool type` / `xdotool key`.
#[derive(Debug, Clone)]
pub struct XdotoolKeyboard {
    program: PathBuf,
    type_delay_ms: u64,
}

impl XdotoolKeyboard {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            type_delay_ms: DEFAULT_TYPE_DELAY_MS,
        }
    }

    /// Find `xdotool` on `PATH`.
    pub fn locate() -> Result<Self, LogError> {
        locate_xdotool().map(Self::new)
    }

    #[must_use]
    pub const fn with_type_delay(mut self, delay_ms: u64) -> Self {
        self.type_delay_ms = delay_ms;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn type_args(&self, text: &str) -> Vec<OsString> {
        vec![
            "type".into(),
            "--clearmodifiers".into(),
            "--delay".into(),
            self.type_delay_ms.to_string().into(),
            // Text starting with '-' must not be taken for an option
            "--".into(),
            text.into(),
        ]
    }

    fn chord_args(chord: &Chord) -> Vec<OsString> {
        vec!["key".into(), "--clearmodifiers".into(), chord.to_string().into()]
    }

    async fn run(&self, args: Vec<OsString>) -> Result<(), LogError> {
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                LogError::Input(format!("failed to run {}: {e}", self.program.display()))
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(LogError::Input(format!(
                "xdotool exited with {}: {}",
                output.status,
                stderr.trim()
            )))
        }
    }
}

#[async_trait]
impl KeyboardSink for XdotoolKeyboard {
    async fn type_text(&self, text: &str) -> Result<(), LogError> {
        if text.is_empty() {
            return Ok(());
        }
        debug!(chars = text.chars().count(), "xdotool type");
        self.run(self.type_args(text)).await
    }

    async fn send_chord(&self, chord: &Chord) -> Result<(), LogError> {
        debug!(%chord, "xdotool key");
        self.run(Self::chord_args(chord)).await
    }
}

pub(crate) fn locate_xdotool() -> Result<PathBuf, LogError> {
    which::which("xdotool").map_err(|e| LogError::Input(format!("xdotool not found on PATH: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_args_guard_leading_dash() {
        let keyboard = XdotoolKeyboard::new("/usr/bin/xdotool").with_type_delay(5);
        let args = keyboard.type_args("-rf is not a flag");
        assert_eq!(
            args,
            vec!["type", "--clearmodifiers", "--delay", "5", "--", "-rf is not a flag"]
        );
    }

    #[test]
    fn chord_args_use_keysym_syntax() {
        let args = XdotoolKeyboard::chord_args(&Chord::save());
        assert_eq!(args, vec!["key", "--clearmodifiers", "ctrl+s"]);

        let args = XdotoolKeyboard::chord_args(&Chord::document_end());
        assert_eq!(args, vec!["key", "--clearmodifiers", "ctrl+End"]);
    }

    #[tokio::test]
    async fn missing_binary_is_input_error() {
        let keyboard = XdotoolKeyboard::new("/nonexistent/xdotool");
        let err = keyboard.send_chord(&Chord::save()).await.unwrap_err();
        assert!(matches!(err, LogError::Input(_)));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn non_zero_exit_is_input_error() {
        // `false` ignores its arguments and exits 1
        let keyboard = XdotoolKeyboard::new("false");
        let err = keyboard.type_text("hello").await.unwrap_err();
        assert!(matches!(err, LogError::Input(msg) if msg.contains("exited")));
    }

    #[tokio::test]
    async fn empty_text_is_skipped() {
        let keyboard = XdotoolKeyboard::new("/nonexistent/xdotool");
        assert!(keyboard.type_text("").await.is_ok());
    }
}
