//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Append incoming messages to a log file by driving a text editor.
///
/// Messages are read line by line from standard input; each one is typed
/// into a freshly launched editor and saved. Runs until input ends or
/// Ctrl+C. Driver behaviour is configured through `NOTELOG_*` variables.
#[derive(Parser, Debug)]
#[command(name = "notelog")]
#[command(version)]
pub struct Cli {
    /// Log file to append to (created with a `.LOG` header if missing)
    pub destination: PathBuf,
}
