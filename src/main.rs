//! TrackMux CLI
//!
//! Reconciles the track layout of a season of episodes into one template and
//! remuxes every episode to it with MKVToolNix.
//!
//! # Usage
//!
//! ```bash
//! trackmux remux "Show/Season 01" --second-directory "Show Dub/Season 01"
//! trackmux edit "Show/Season 01" --prompt-additional-tags
//! trackmux extract "Show/Season 01" --track-type subtitles --language eng
//! trackmux verify "Show/Season 01/remux"
//! trackmux inspect "Show/Season 01/Show.S01E01.mkv" --format json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use trackmux_cli::app::container::DefaultAppContainer;
use trackmux_cli::cli::{commands, Cli};
use trackmux_cli::config_initialization::initialize_configuration_hierarchy;
use trackmux_cli::utils::logging::init_logging;

/// Main entry point for the TrackMux CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let settings = initialize_configuration_hierarchy(&cli)?;
    init_logging(&settings.logging).context("Failed to initialize logging")?;
    info!("Starting TrackMux {}", env!("CARGO_PKG_VERSION"));

    let container = DefaultAppContainer::new(&settings).context("Failed to set up adapters")?;

    // Execute the requested command
    if let Err(e) = commands::run(cli.command, &container, &settings).await {
        error!("{:#}", e);
        return Err(e);
    }

    info!("TrackMux completed successfully");
    Ok(())
}
