//! Validation error types

use std::fmt;

/// Validation error for snippet input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length (in characters)
    TooLong { field: &'static str, max: usize },

    /// Value is malformed (e.g. a non-numeric id)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Numeric value outside the permitted set
    NotPermitted {
        field: &'static str,
        value: i64,
        allowed: &'static [u32],
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::NotPermitted {
                field,
                value,
                allowed,
            } => {
                let allowed: Vec<String> = allowed.iter().map(u32::to_string).collect();
                write!(
                    f,
                    "{} must be one of {} (got {})",
                    field,
                    allowed.join(", "),
                    value
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
