//! Telegram user payload
//!
//! The `user` field of Mini App init data is a JSON object describing the
//! Telegram account that opened the app. Only the fields the marketplace
//! stores are decoded; anything else Telegram adds is ignored.

use serde::{Deserialize, Serialize};

/// User object decoded from init data.
///
/// Holding a `ParsedUser` does not by itself mean the data was signed by
/// Telegram: only [`crate::domain::init_data::verify`] hands out a bare
/// `ParsedUser`. The unsigned path yields [`UnverifiedUser`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ParsedUser {
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// User decoded from init data whose signature was NOT checked.
///
/// Produced only by `extract_unverified`. Callers must opt in explicitly
/// through [`UnverifiedUser::into_unchecked`] to get at the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedUser(ParsedUser);

impl UnverifiedUser {
    pub(crate) fn new(user: ParsedUser) -> Self {
        Self(user)
    }

    /// Claimed Telegram id, for audit logging.
    pub fn telegram_id(&self) -> i64 {
        self.0.id
    }

    pub fn into_unchecked(self) -> ParsedUser {
        self.0
    }
}
