//! Fantasy Golf Service
//!
//! Loads the cached golfer pool and tournament schedule, then serves the
//! roster API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use futures::FutureExt;
use std::path::PathBuf;
use tracing::info;

use fantasy_golf_service::{
    initialize_logging, load_configuration, setup_signal_handlers, ServiceState,
};

#[derive(Debug, Parser)]
#[command(name = "fantasy-golf", version, about = "Fantasy golf roster picker service")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the cached rankings and schedule
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Fetch feeds with no cached file before starting
    #[arg(long)]
    fetch_missing: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = load_configuration(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.data.dir = data_dir;
    }
    config.data.fetch_missing |= args.fetch_missing;

    initialize_logging(&config.logging)?;
    info!("Starting Fantasy Golf Service v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", config.data.dir);

    let service_state = ServiceState::new(config).await.context("Failed to start service")?;

    let shutdown_signal = setup_signal_handlers()?.map(|_| {
        info!("Shutdown signal received. Initiating graceful shutdown...");
    });

    info!("Fantasy Golf Service is running. Press Ctrl+C to shutdown gracefully.");
    service_state.run(shutdown_signal).await?;

    info!("Fantasy Golf Service shutdown complete");
    Ok(())
}
