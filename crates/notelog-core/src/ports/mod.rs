//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no process or input-injection implementation details.
//!
//! # Design Rules
//!
//! - No OS handles or process types in any signature
//! - Keyboard injection is expressed as intent (`type_text`, `send_chord`)
//! - Sessions are opened through a factory so writers can be tested with fakes

pub mod keyboard;
pub mod readiness;
pub mod session;

pub use keyboard::{Chord, Key, KeyboardSink, Modifier};
pub use readiness::ReadinessProbe;
pub use session::{EditorSession, SessionFactory};

#[cfg(test)]
pub use session::MockEditorSession;
