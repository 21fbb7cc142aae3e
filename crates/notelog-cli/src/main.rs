//! CLI entry point.
//!
//! Sets up logging and the environment, then hands off to `execute`.
//! Exit code 0 on clean shutdown (Ctrl+C or end of input).

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use notelog_cli::{Cli, CliError, execute};

fn init_tracing() {
    // Logs go to stderr; stdout only echoes forwarded messages
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    // Load environment variables before logging reads RUST_LOG
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let code = match execute(cli).await {
        Ok(summary) => {
            info!(forwarded = summary.forwarded, reason = ?summary.reason, "Shut down cleanly");
            0
        }
        Err(err) => {
            error!("{err:#}");
            err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
        }
    };

    // A pending stdin read would otherwise hold the runtime open
    std::process::exit(code);
}
