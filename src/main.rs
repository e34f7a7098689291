use clap::{Parser, Subcommand};
use database::DbRepository;
use std::path::PathBuf;

mod seed;

/// Savings-rate listings, alerts, and an interest calculator behind one HTTP API.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API on the configured host and port.
    Serve,
    /// Load the starter products and articles into the configured store.
    Seed(SeedArgs),
}

#[derive(Parser)]
struct SeedArgs {
    /// A JSON file with `products` and `educational` arrays to load instead of the bundled set.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = configuration::load_config()?;
    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = configuration::init_tracing(&config.logging)?;

    match cli.command {
        Commands::Serve => web_server::run_server(config).await,
        Commands::Seed(args) => handle_seed(args, &config).await,
    }
}

async fn handle_seed(args: SeedArgs, config: &configuration::Config) -> anyhow::Result<()> {
    let data = match &args.file {
        Some(path) => seed::SeedData::from_file(path)?,
        None => seed::SeedData::bundled()?,
    };

    let store = database::connect(&config.store).await?;
    let repo = DbRepository::new(store);
    let report = seed::run(&repo, data).await;

    if report.products_failed + report.educational_failed > 0 {
        tracing::warn!(
            products_failed = report.products_failed,
            educational_failed = report.educational_failed,
            "Some seed records were not stored."
        );
    }
    Ok(())
}
