//! Listing Status
//!
//! New listings wait for a moderator. Approval makes them visible in the
//! catalogue; rejection keeps them visible only to the seller.
//!
//! ```text
//! Pending  -> Active | Rejected
//! Active   -> Rejected | Sold | Inactive
//! Rejected -> Active
//! Inactive -> Active
//! Sold     (terminal)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ListingStatus {
    #[default]
    Pending = 0,
    Active = 1,
    Rejected = 2,
    Sold = 3,
    Inactive = 4,
}

impl ListingStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Sold => "sold",
            Self::Inactive => "inactive",
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Pending),
            1 => Some(Self::Active),
            2 => Some(Self::Rejected),
            3 => Some(Self::Sold),
            4 => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Shown in the public catalogue
    #[inline]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Active)
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Sold)
    }

    pub const fn can_transition_to(&self, next: ListingStatus) -> bool {
        use ListingStatus::*;
        matches!(
            (self, next),
            (Pending, Active | Rejected)
                | (Active, Rejected | Sold | Inactive)
                | (Rejected, Active)
                | (Inactive, Active)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown listing status: {0}")]
pub struct ParseListingStatusError(pub String);

impl FromStr for ListingStatus {
    type Err = ParseListingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            "sold" => Ok(Self::Sold),
            "inactive" => Ok(Self::Inactive),
            other => Err(ParseListingStatusError(other.to_string())),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
