//! HTTP server command
//!
//! Runs the school directory API against Postgres, or against an in-memory
//! store with `--memory`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use schoolctl_server::db::pool::create_pool_with_options;
use schoolctl_server::db::{migrations, MemoryStore, SchoolRepo, SchoolStore};
use schoolctl_server::{run_server, AppState, SchoolService, UploadStore};

use crate::config::SchoolctlConfig;

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allowed CORS origin (repeatable; default: http://localhost:5173)
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origins: Vec<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory uploaded images are stored in and served from
    #[arg(long, value_name = "DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Keep records in memory instead of Postgres (lost on exit)
    #[arg(long)]
    pub memory: bool,

    /// Skip creating the schools table on startup
    #[arg(long)]
    pub skip_migrations: bool,

    /// Include internal error text in 500 responses
    #[arg(long)]
    pub expose_errors: bool,
}

impl ServeArgs {
    /// Flags win over file and environment values.
    fn apply(&self, config: &mut SchoolctlConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if !self.cors_origins.is_empty() {
            config.server.cors_origins = self.cors_origins.clone();
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
        if let Some(dir) = &self.upload_dir {
            config.uploads.dir = dir.clone();
        }
        if self.expose_errors {
            config.server.expose_error_details = true;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: SchoolctlConfig) -> Result<()> {
    args.apply(&mut config);

    let store: Arc<dyn SchoolStore> = if args.memory {
        tracing::warn!("Using in-memory store - records are lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        let database_url = config.database.url.as_deref().context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, .env, \
             or [database] url in ~/.schoolctl/config.toml (or use --memory)",
        )?;

        let pool = create_pool_with_options(database_url, config.database.max_connections)
            .await
            .context("Failed to create database pool")?;

        if !args.skip_migrations {
            migrations::run(&pool)
                .await
                .context("Failed to prepare database schema")?;
        }
        Arc::new(SchoolRepo::new(pool))
    };

    tracing::info!("Starting schoolctl server on {}", config.server.bind);

    let state = AppState::new(
        SchoolService::new(store),
        UploadStore::new(config.uploads.dir.clone()),
    );

    // Run server (blocks until shutdown)
    run_server(state, config.server_config())
        .await
        .context("Server error")?;

    Ok(())
}
