//! schoolctl CLI - school directory API server
//!
//! - `serve`: run the HTTP API (Postgres or in-memory store)
//! - `migrate`: create the schools table and indexes
//! - `config`: inspect resolved configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::SchoolctlConfig;
use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "schoolctl",
    author,
    version,
    about = "School directory REST API with search, pagination and image uploads"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.schoolctl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the database schema if missing
    Migrate(commands::migrate::MigrateArgs),
    /// Inspect schoolctl configuration (show, path)
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = init_tracing(&TracingConfig { debug: cli.debug }) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    match cli.command {
        Commands::Serve(args) => {
            let config = SchoolctlConfig::load(cli.config.as_deref())?;
            commands::run_serve(args, config).await?
        }
        Commands::Migrate(args) => {
            let config = SchoolctlConfig::load(cli.config.as_deref())?;
            commands::run_migrate(args, config).await?
        }
        Commands::Config(args) => config::run_config(args, cli.config.as_deref())?,
    }

    Ok(())
}
