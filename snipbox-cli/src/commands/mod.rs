//! Command implementations for the snipbox CLI

pub mod migrate;
pub mod serve;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use snipbox_server::db::{create_pool_with_options, PgPool, PoolConfig};

pub use migrate::run_migrate;
pub use serve::run_serve;

/// Connection options shared by every command that touches the database
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Database URL (overrides .env)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "SNIPBOX_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Seconds to wait for a free connection
    #[arg(long, default_value_t = 5)]
    pub acquire_timeout_secs: u64,
}

impl DatabaseArgs {
    /// Create the process-wide pool.
    pub async fn connect(&self) -> Result<PgPool> {
        create_pool_with_options(&self.database_url, &self.pool_config())
            .await
            .context("Failed to create database pool")
    }

    /// Pool options with zero values raised to their floor.
    fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.max_connections.max(1),
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs.max(1)),
        }
    }
}
