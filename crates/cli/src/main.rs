use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quakedb_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quakedb")]
#[command(about = "Earthquake catalog web service backed by PostgreSQL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        #[arg(short, long, default_value = "5000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Create the earthquake tables and indexes if missing
    Migrate,
    /// Ingest a local CSV catalog the same way /upload does
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal; real environment variables still apply.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(config, &host, port).await?,
        Commands::Migrate => commands::migrate::run(&config).await?,
        Commands::Import { path } => commands::import::run(&config, &path).await?,
    }

    Ok(())
}
