use anyhow::Context;
use clap::{Parser, ValueEnum};
use golf_data_fetcher::{FetcherConfig, GolfDataFetcher};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    /// World golf rankings only
    Rankings,
    /// Tournament schedule only
    Schedule,
    /// Both feeds
    All,
    /// Only feeds with no cached file yet
    Init,
}

#[derive(Debug, Parser)]
#[command(name = "golf-data-fetcher", about = "Refresh cached golf data files")]
struct Args {
    #[arg(value_enum, default_value = "all")]
    target: Target,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!("Starting golf data refresh: {:?}", args.target);

    let config = FetcherConfig::from_env()?;
    let fetcher = GolfDataFetcher::new(config).context("Failed to create fetcher")?;

    match args.target {
        Target::Rankings => {
            fetcher.refresh_rankings().await.context("Failed to refresh rankings")?;
        }
        Target::Schedule => {
            fetcher.refresh_schedule().await.context("Failed to refresh schedule")?;
        }
        Target::All => {
            fetcher.refresh_all().await.context("Failed to refresh golf data")?;
        }
        Target::Init => {
            let fetched = fetcher.ensure_cached().await;
            info!("Fetched {} missing feed(s)", fetched.len());
        }
    }

    info!("Golf data refresh complete");
    Ok(())
}
