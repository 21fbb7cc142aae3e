//! CLI adapter for notelog: appends messages read from standard input to a
//! log file by driving a text editor.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary target only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod parser;
pub mod run;
pub mod source;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, bootstrap};
pub use error::CliError;
pub use parser::Cli;
pub use run::{RunSummary, StopReason, control_loop, execute};
pub use source::{LineEventSource, stdin_source};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
