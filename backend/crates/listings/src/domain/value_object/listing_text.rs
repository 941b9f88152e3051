//! Listing Title / Description Value Objects
//!
//! Free text typed by the seller.
//!
//! ## Invariants
//! - Trimmed, never empty
//! - Title: 1..=120 characters, single line
//! - Description: 1..=2048 characters, newlines and tabs allowed
//! - No other control characters

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

pub const TITLE_MAX_LENGTH: usize = 120;

pub const DESCRIPTION_MAX_LENGTH: usize = 2048;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingTextError {
    Empty { field: &'static str },

    TooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },

    ControlCharacter { field: &'static str, position: usize },
}

impl fmt::Display for ListingTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} cannot be empty"),
            Self::TooLong { field, length, max } => {
                write!(f, "{field} is too long ({length} chars, maximum {max})")
            }
            Self::ControlCharacter { field, position } => {
                write!(f, "{field} contains a control character at position {position}")
            }
        }
    }
}

impl std::error::Error for ListingTextError {}

fn validate(
    field: &'static str,
    input: &str,
    max: usize,
    multiline: bool,
) -> Result<String, ListingTextError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ListingTextError::Empty { field });
    }

    let length = value.chars().count();
    if length > max {
        return Err(ListingTextError::TooLong { field, length, max });
    }

    let allowed = |c: char| multiline && matches!(c, '\n' | '\r' | '\t');
    if let Some(position) = value.chars().position(|c| c.is_control() && !allowed(c)) {
        return Err(ListingTextError::ControlCharacter { field, position });
    }

    Ok(value.to_string())
}

// ============================================================================
// ListingTitle
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListingTitle(String);

impl ListingTitle {
    pub fn new(input: impl AsRef<str>) -> Result<Self, ListingTextError> {
        validate("Title", input.as_ref(), TITLE_MAX_LENGTH, false).map(Self)
    }

    /// Stored values were validated on the way in.
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ListingTitle {
    type Error = ListingTextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ListingTitle> for String {
    fn from(value: ListingTitle) -> Self {
        value.0
    }
}

impl fmt::Display for ListingTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// ListingDescription
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListingDescription(String);

impl ListingDescription {
    pub fn new(input: impl AsRef<str>) -> Result<Self, ListingTextError> {
        validate("Description", input.as_ref(), DESCRIPTION_MAX_LENGTH, true).map(Self)
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ListingDescription {
    type Error = ListingTextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ListingDescription> for String {
    fn from(value: ListingDescription) -> Self {
        value.0
    }
}
