//! snipbox CLI - expiring snippet service
//!
//! - `serve`: run the HTTP API over the snippet store
//! - `migrate`: apply schema migrations and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "snipbox",
    author,
    version,
    about = "Publish short text snippets that expire",
    long_about = "Serve a small JSON API for creating, viewing and listing text snippets. \
                  Snippets stay visible for a fixed number of days and then drop out of every query."
)]
struct Cli {
    /// Verbose logging (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server (migrates on startup)
    Serve(commands::serve::ServeArgs),
    /// Apply pending database migrations and exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Values from .env fill in anything not already in the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
    }
    Ok(())
}
