//! Authenticated principal
//!
//! Auth middleware resolves a session into a [`Principal`] and stores it in
//! request extensions; other crates read it without depending on `auth`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::id::UserId;

/// Marketplace role. Stored as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum Role {
    #[default]
    Student = 0,
    Moderator = 1,
    Admin = 2,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl Role {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// Moderators and admins review listings.
    #[inline]
    pub const fn can_moderate(&self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Role::Student),
            1 => Some(Role::Moderator),
            2 => Some(Role::Admin),
            _ => None,
        }
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The user behind the current request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: UserId,
    pub public_id: String,
    pub role: Role,
    /// `false` when the session was opened through the unverified
    /// init-data fallback.
    pub identity_verified: bool,
}

impl Principal {
    #[inline]
    pub fn is(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }
}
