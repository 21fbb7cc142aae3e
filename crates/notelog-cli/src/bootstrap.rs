//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Driver settings (defaults, settings file, `NOTELOG_*` variables)
//! - Editor session factory with platform keyboard and readiness probe
//!   (via notelog-runtime)
//! - Serialized writer and destination bootstrap (via notelog-core)

use std::path::PathBuf;
use std::sync::Arc;

use notelog_core::{DriverSettings, SerializedWriter};
use notelog_runtime::EditorSessionFactory;
use tracing::{debug, info};

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Log file to append to, as given on the command line.
    pub destination: PathBuf,
    /// Editor driver settings.
    pub settings: DriverSettings,
}

impl CliConfig {
    /// Combine parsed arguments with settings from the environment.
    pub fn from_cli(cli: Cli) -> Result<Self, CliError> {
        Ok(Self {
            destination: cli.destination,
            settings: DriverSettings::from_env()?,
        })
    }
}

/// Build the writer for `config`, creating the log file if needed.
pub fn bootstrap(config: CliConfig) -> Result<SerializedWriter, CliError> {
    debug!(settings = ?config.settings, "Driver settings");
    let editor = config.settings.editor_program.clone();
    let factory = EditorSessionFactory::for_platform(config.settings)?;
    let writer = SerializedWriter::open(&config.destination, Arc::new(factory))?;

    info!(
        path = %writer.destination().display(),
        editor = %editor,
        "Log writer ready"
    );
    Ok(writer)
}
