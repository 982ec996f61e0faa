//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod snippet;
pub mod validation;

pub use snippet::{LifetimeDays, SnippetContent, SnippetId, SnippetTitle, PERMITTED_LIFETIMES};
pub use validation::ValidationError;
