//! Database connection pool management
//!
//! The pool is created once by the process, handed to repositories by
//! reference, and closed once at shutdown. Repositories never close or
//! resize it.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Embedded schema migrations (workspace `migrations/` directory).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../migrations");

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a caller waits for a free connection before giving up.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool sizing options
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

/// Create a PostgreSQL connection pool with default options.
///
/// # Errors
///
/// Returns an error if the initial connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/snipbox").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, &PoolConfig::default()).await
}

/// Create a PostgreSQL connection pool with custom options.
///
/// # Errors
///
/// Returns an error if the initial connection fails.
pub async fn create_pool_with_options(
    database_url: &str,
    config: &PoolConfig,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails or the applied history diverges
/// from the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running snippet migrations...");
    MIGRATOR.run(pool).await?;
    tracing::info!("Snippet migrations complete");
    Ok(())
}
