//! Snippet input validation
//!
//! The store trusts these types: anything that reaches
//! [`SnippetRepo::insert`](crate::db::SnippetRepo::insert) has already been
//! checked here.

use super::ValidationError;

/// Maximum length for snippet titles, in characters
const MAX_TITLE_LEN: usize = 100;

/// Lifetimes offered by the create form, in days
pub const PERMITTED_LIFETIMES: &[u32] = &[1, 7, 365];

/// Upper bound for any lifetime (100 years), keeps day arithmetic in `i32`
const MAX_LIFETIME_DAYS: u32 = 36_500;

/// Validated snippet title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetTitle(String);

impl SnippetTitle {
    /// Create a new snippet title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 100 characters
    /// - No NUL characters
    ///
    /// # Example
    /// ```
    /// use snipbox_server::models::SnippetTitle;
    ///
    /// assert!(SnippetTitle::new("O snail").is_ok());
    /// assert!(SnippetTitle::new("").is_err());
    /// assert!(SnippetTitle::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        reject_nul("title", trimmed)?;

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated snippet body. Kept verbatim; only blank bodies and NUL
/// characters are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetContent(String);

impl SnippetContent {
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }
        reject_nul("content", &s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Text columns cannot hold NUL.
fn reject_nul(field: &'static str, s: &str) -> Result<(), ValidationError> {
    if s.contains('\0') {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must not contain NUL characters",
        });
    }
    Ok(())
}

/// Number of days a snippet stays valid after insertion. Always positive,
/// so every stored row satisfies `expires > created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LifetimeDays(u32);

impl LifetimeDays {
    /// Any day count in `1..=36500`.
    pub fn new(days: u32) -> Result<Self, ValidationError> {
        if days == 0 {
            return Err(ValidationError::InvalidFormat {
                field: "expires",
                reason: "lifetime must be at least one day",
            });
        }
        if days > MAX_LIFETIME_DAYS {
            return Err(ValidationError::InvalidFormat {
                field: "expires",
                reason: "lifetime must not exceed 36500 days",
            });
        }
        Ok(Self(days))
    }

    /// Restrict to the lifetimes offered by the create form.
    pub fn from_form(days: i64) -> Result<Self, ValidationError> {
        match u32::try_from(days) {
            Ok(d) if PERMITTED_LIFETIMES.contains(&d) => Ok(Self(d)),
            _ => Err(ValidationError::NotPermitted {
                field: "expires",
                value: days,
                allowed: PERMITTED_LIFETIMES,
            }),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Day count as bound into SQL.
    pub fn as_i32(self) -> i32 {
        // Bounded by MAX_LIFETIME_DAYS
        self.0 as i32
    }
}

/// Snippet identifier parsed from a request path. Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnippetId(i64);

impl SnippetId {
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id < 1 {
            return Err(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be a positive integer",
            });
        }
        Ok(Self(id))
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let id = s.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
            field: "id",
            reason: "must be a positive integer",
        })?;
        Self::new(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}
