//! Paperlink CLI - paperlink command

use anyhow::Result;
use clap::Parser;
use cli_lib::{daemon, logging, Args, Settings};
use tracing::{error, info};

/// Exit code for setup failures (watch, backup dir, http client)
const EXIT_SETUP: i32 = 1;

/// Exit code for invalid configuration
const EXIT_CONFIG: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = match Settings::load(args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Logging first so everything after is structured
    let guard = logging::init(&settings.log())?;

    info!(version = env!("CARGO_PKG_VERSION"), "paperlink starting");

    let config = match settings.config() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            eprintln!("Run 'paperlink --help' for usage.");
            drop(guard);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let stats = match daemon::run(config).await {
        Ok(stats) => stats,
        Err(err) => {
            error!(error = %format!("{err:#}"), "failed to start");
            drop(guard);
            std::process::exit(EXIT_SETUP);
        }
    };

    info!(
        uploaded = stats.uploaded,
        failed = stats.failed,
        undisposed = stats.undisposed,
        "paperlink stopped"
    );
    Ok(())
}
