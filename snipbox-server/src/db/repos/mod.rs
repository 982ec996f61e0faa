//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the shared pool, one statement per operation
//! - Bound parameters only
//! - Typed errors, no logging on the caller's behalf

pub mod snippets;

pub use snippets::{
    DbError, Snippet, SnippetRepo, DEFAULT_LATEST_LIMIT, DEFAULT_QUERY_TIMEOUT, MAX_LATEST_LIMIT,
};
