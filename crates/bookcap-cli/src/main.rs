use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod capture;
mod preview;

#[derive(Debug, Parser)]
#[command(name = "bookcap")]
#[command(about = "Capture Amazon book product data for the ingestion dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Capture a product page: extract, normalize, preview, optionally submit
    Capture(capture::CaptureArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = bookcap_core::load_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Capture(args) => capture::run(&config, args).await,
    }
}
