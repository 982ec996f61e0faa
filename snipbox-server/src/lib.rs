//! snipbox-server: expiring snippet store with a JSON HTTP API
//!
//! The [`db`] layer owns persistence and the validity window; [`http`]
//! translates requests into store calls and never touches SQL itself.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, PoolConfig, MIGRATOR};
pub use db::repos::{DbError, Snippet, SnippetRepo};
pub use http::{build_router, run_server, ServerConfig, ServerError};
