//! nomsops main entry point

use clap::Parser;
use nomsops_api::start_server;
use nomsops_config::Config;
use nomsops_data::Dataset;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "nomsops")]
#[command(version = "0.1.0")]
#[command(about = "Prototype web interface for exploring prisoner money transfer filters", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // a missing config file is fine for a prototype: run on defaults
    let config = Config::load_or_default(&args.config)?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if args.config.exists() {
        log::info!("config loaded from {}", args.config.display());
    } else {
        log::warn!(
            "config file not found at {}, using defaults",
            args.config.display()
        );
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        // generated once, read-only for the rest of the process
        let dataset = Arc::new(Dataset::generate(&config.dataset));
        start_server(config, dataset).await;
    });

    Ok(())
}
