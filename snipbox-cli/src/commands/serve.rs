//! HTTP server command
//!
//! Owns the pool lifecycle: create once, migrate, serve until a shutdown
//! signal, then close.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use snipbox_server::db::run_migrations;
use snipbox_server::http::{run_server, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "SNIPBOX_BIND", default_value = "127.0.0.1:4000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Deadline for each store operation, in seconds
    #[arg(long, env = "SNIPBOX_QUERY_TIMEOUT_SECS", default_value_t = 5)]
    pub query_timeout_secs: u64,

    /// Skip applying migrations at startup
    #[arg(long)]
    pub no_migrate: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            query_timeout: Duration::from_secs(self.query_timeout_secs.max(1)),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting snipbox server on {}", args.bind);

    let pool = args.database.connect().await?;

    if !args.no_migrate {
        run_migrations(&pool)
            .await
            .context("Failed to apply migrations")?;
    }

    let result = run_server(pool.clone(), args.server_config())
        .await
        .context("Server error");

    pool.close().await;
    tracing::info!("Database pool closed");

    result
}
