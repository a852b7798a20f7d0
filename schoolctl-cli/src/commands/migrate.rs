//! Schema setup command

use anyhow::{Context, Result};
use clap::Parser;

use schoolctl_server::db::migrations;
use schoolctl_server::db::pool::create_pool_with_options;

use crate::config::SchoolctlConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Create the schools table and indexes if missing
pub async fn run_migrate(args: MigrateArgs, config: SchoolctlConfig) -> Result<()> {
    let database_url = args
        .database_url
        .or(config.database.url)
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.schoolctl/config.toml")?;

    let pool = create_pool_with_options(&database_url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to apply schema")?;

    println!("Schema is up to date");
    Ok(())
}
