//! Keyboard input sink port.
//!
//! Editor sessions never talk to an input-injection mechanism directly; they
//! go through this trait so a fake sink can stand in during tests.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Modifier key held down while a chord's key is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Control,
    Shift,
    Alt,
}

impl Modifier {
    /// Name understood by X11 keysym-based tools.
    pub const fn keysym(self) -> &'static str {
        match self {
            Self::Control => "ctrl",
            Self::Shift => "shift",
            Self::Alt => "alt",
        }
    }
}

/// Non-modifier key of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character key (case-insensitive for chords).
    Char(char),
    /// The End navigation key.
    End,
}

/// A modifier chord such as Ctrl+S.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub modifiers: Vec<Modifier>,
    pub key: Key,
}

impl Chord {
    /// Create a chord from modifiers and a key.
    pub fn new(modifiers: impl Into<Vec<Modifier>>, key: Key) -> Self {
        Self {
            modifiers: modifiers.into(),
            key,
        }
    }

    /// The "save document" chord, Ctrl+S.
    pub fn save() -> Self {
        Self::new([Modifier::Control], Key::Char('s'))
    }

    /// Ctrl+End, which moves the caret to the end of the document.
    pub fn document_end() -> Self {
        Self::new([Modifier::Control], Key::End)
    }
}

impl fmt::Display for Chord {
    /// Formats as `ctrl+s`, the xdotool key syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.keysym())?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{}", c.to_ascii_lowercase()),
            Key::End => f.write_str("End"),
        }
    }
}

/// Sink for synthetic keyboard events delivered to the focused window.
///
/// No focus verification is performed; whatever window holds input focus
/// receives the events.
#[async_trait]
pub trait KeyboardSink: Send + Sync {
    /// Type `text` literally as text-entry events.
    async fn type_text(&self, text: &str) -> Result<(), LogError>;

    /// Press and release a modifier chord.
    async fn send_chord(&self, chord: &Chord) -> Result<(), LogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_chord_formats_as_keysym() {
        assert_eq!(Chord::save().to_string(), "ctrl+s");
    }

    #[test]
    fn test_multi_modifier_chord() {
        let chord = Chord::new([Modifier::Control, Modifier::Shift], Key::Char('S'));
        assert_eq!(chord.to_string(), "ctrl+shift+s");
    }

    #[test]
    fn test_document_end_uses_keysym_name() {
        assert_eq!(Chord::document_end().to_string(), "ctrl+End");
        assert_ne!(Chord::document_end(), Chord::save());
    }
}
