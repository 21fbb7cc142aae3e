//! Editor driver settings.
//!
//! Settings come from three layers, later layers winning: built-in defaults,
//! an optional JSON file named by `NOTELOG_SETTINGS`, and individual
//! `NOTELOG_*` environment variables.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-character delay used to size the settling wait after input injection.
pub const DEFAULT_KEYSTROKE_DELAY_MS: u64 = 5;

/// Delay used by the settle-based readiness probe.
pub const DEFAULT_READY_DELAY_MS: u64 = 500;

/// Environment variable naming an optional JSON settings file.
pub const SETTINGS_FILE_ENV: &str = "NOTELOG_SETTINGS";

#[cfg(windows)]
const DEFAULT_EDITOR: &str = "notepad.exe";
#[cfg(windows)]
const DEFAULT_EDITOR_ARGS: &[&str] = &[];
// Notepad opens `.LOG` files with the caret at the end
#[cfg(windows)]
const DEFAULT_SEEK_END: bool = false;

// A standalone instance keeps the launched PID as the window owner
#[cfg(not(windows))]
const DEFAULT_EDITOR: &str = "gedit";
#[cfg(not(windows))]
const DEFAULT_EDITOR_ARGS: &[&str] = &["--standalone"];
#[cfg(not(windows))]
const DEFAULT_SEEK_END: bool = true;

/// How editor sessions are launched, driven and torn down.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DriverSettings {
    /// Editor executable, resolved through `PATH` when not absolute.
    pub editor_program: String,

    /// Arguments placed before the document path.
    pub editor_args: Vec<String>,

    /// Settling delay per typed character, in milliseconds.
    pub keystroke_delay_ms: u64,

    /// Upper bound on the readiness wait. `None` waits forever.
    pub launch_timeout_ms: Option<u64>,

    /// Upper bound on the wait for exit after a close request. `None` waits forever.
    pub close_timeout_ms: Option<u64>,

    /// Force-kill the editor when the close wait times out instead of failing.
    pub kill_on_close_timeout: bool,

    /// Fixed delay for the settle-based readiness probe.
    pub ready_delay_ms: u64,

    /// Fail writes on a session without a process instead of silently skipping.
    pub fail_on_missing_process: bool,

    /// Press Ctrl+End before typing, for editors that do not open at the end
    /// of the document on their own.
    pub seek_end_before_typing: bool,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            editor_program: DEFAULT_EDITOR.to_string(),
            editor_args: DEFAULT_EDITOR_ARGS.iter().map(|a| (*a).to_string()).collect(),
            keystroke_delay_ms: DEFAULT_KEYSTROKE_DELAY_MS,
            launch_timeout_ms: None,
            close_timeout_ms: None,
            kill_on_close_timeout: false,
            ready_delay_ms: DEFAULT_READY_DELAY_MS,
            fail_on_missing_process: false,
            seek_end_before_typing: DEFAULT_SEEK_END,
        }
    }
}

impl DriverSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// Tests pass a closure over a map instead of mutating the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(SETTINGS_FILE_ENV) {
            Some(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };

        if let Some(program) = lookup("NOTELOG_EDITOR") {
            settings.editor_program = program;
        }
        if let Some(args) = lookup("NOTELOG_EDITOR_ARGS") {
            settings.editor_args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(value) = lookup("NOTELOG_KEYSTROKE_DELAY_MS") {
            settings.keystroke_delay_ms = parse_millis("NOTELOG_KEYSTROKE_DELAY_MS", &value)?;
        }
        if let Some(value) = lookup("NOTELOG_LAUNCH_TIMEOUT_MS") {
            settings.launch_timeout_ms =
                Some(parse_millis("NOTELOG_LAUNCH_TIMEOUT_MS", &value)?);
        }
        if let Some(value) = lookup("NOTELOG_CLOSE_TIMEOUT_MS") {
            settings.close_timeout_ms = Some(parse_millis("NOTELOG_CLOSE_TIMEOUT_MS", &value)?);
        }
        if let Some(value) = lookup("NOTELOG_KILL_ON_CLOSE_TIMEOUT") {
            settings.kill_on_close_timeout = parse_flag("NOTELOG_KILL_ON_CLOSE_TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("NOTELOG_READY_DELAY_MS") {
            settings.ready_delay_ms = parse_millis("NOTELOG_READY_DELAY_MS", &value)?;
        }
        if let Some(value) = lookup("NOTELOG_STRICT_SESSION") {
            settings.fail_on_missing_process = parse_flag("NOTELOG_STRICT_SESSION", &value)?;
        }
        if let Some(value) = lookup("NOTELOG_SEEK_END") {
            settings.seek_end_before_typing = parse_flag("NOTELOG_SEEK_END", &value)?;
        }

        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Read settings from a JSON file; missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|e| SettingsError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| SettingsError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Settling delay after typing `message`: one keystroke delay per
    /// character plus one for the save chord.
    pub fn settling_delay(&self, message: &str) -> Duration {
        let keystrokes = message.chars().count() as u64 + 1;
        Duration::from_millis(self.keystroke_delay_ms.saturating_mul(keystrokes))
    }

    pub fn launch_timeout(&self) -> Option<Duration> {
        self.launch_timeout_ms.map(Duration::from_millis)
    }

    pub fn close_timeout(&self) -> Option<Duration> {
        self.close_timeout_ms.map(Duration::from_millis)
    }

    pub const fn ready_delay(&self) -> Duration {
        Duration::from_millis(self.ready_delay_ms)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Editor program cannot be empty")]
    EmptyEditorProgram,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{key} must be a whole number of milliseconds, got {value:?}")]
    InvalidMillis { key: String, value: String },

    #[error("{key} must be true/false, got {value:?}")]
    InvalidFlag { key: String, value: String },

    #[error("Failed to load settings file {path}: {reason}")]
    File { path: String, reason: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &DriverSettings) -> Result<(), SettingsError> {
    if settings.editor_program.trim().is_empty() {
        return Err(SettingsError::EmptyEditorProgram);
    }
    if settings.launch_timeout_ms == Some(0) {
        return Err(SettingsError::ZeroTimeout("launch timeout"));
    }
    if settings.close_timeout_ms == Some(0) {
        return Err(SettingsError::ZeroTimeout("close timeout"));
    }
    Ok(())
}

fn parse_millis(key: &str, value: &str) -> Result<u64, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidMillis {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SettingsError::InvalidFlag {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
