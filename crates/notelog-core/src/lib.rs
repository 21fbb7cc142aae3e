//! Core domain for notelog: appending messages to a plain-text log by
//! driving an unmodified editor through synthetic keyboard input.
//!
//! This crate owns the serialized writer, the destination-file bootstrap,
//! driver settings and the ports that OS adapters implement. It has no
//! knowledge of processes or input-injection mechanisms.
#![deny(unused_crate_dependencies)]

pub mod bootstrap;
pub mod error;
pub mod ports;
pub mod settings;
pub mod writer;

pub use bootstrap::{Bootstrap, LOG_HEADER, ensure_log_file, resolve_destination};
pub use error::LogError;
pub use ports::{Chord, EditorSession, Key, KeyboardSink, Modifier, ReadinessProbe, SessionFactory};
pub use settings::{DriverSettings, SettingsError, validate_settings};
pub use writer::SerializedWriter;
