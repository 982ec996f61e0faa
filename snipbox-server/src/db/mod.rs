//! Database layer - connection pool, migrations and the snippet store
//!
//! # Design Principles
//!
//! - One shared pool, owned by the process and borrowed by repositories
//! - One statement per operation, no multi-statement transactions
//! - Validity is decided by the database clock (`NOW()`) at query time
//! - Values are always bound, never interpolated

pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options, run_migrations, PoolConfig, MIGRATOR};
pub use repos::*;
pub use sqlx::PgPool;
