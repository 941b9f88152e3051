//! Telegram Mini App init data verification
//!
//! `Telegram.WebApp.initData` is an `application/x-www-form-urlencoded`
//! string. Telegram signs it as follows:
//!
//! 1. every field except `hash` becomes `key=value` (decoded values)
//! 2. the lines are sorted by key and joined with `\n` (the *data check string*)
//! 3. `secret_key = HMAC-SHA256(key = "WebAppData", msg = bot_token)`
//! 4. `hash = hex(HMAC-SHA256(key = secret_key, msg = data_check_string))`
//!
//! Everything here is pure: no I/O, no clock, no logging. Freshness of
//! `auth_date` and audit logging live in the application layer.
//!
//! Duplicate keys: the last occurrence wins, for `hash` as well as for
//! signed fields.

use std::collections::BTreeMap;

use platform::crypto::{constant_time_eq, hmac_sha256, to_hex};

use crate::domain::value_object::telegram_user::{ParsedUser, UnverifiedUser};

pub const HASH_FIELD: &str = "hash";
pub const USER_FIELD: &str = "user";
pub const AUTH_DATE_FIELD: &str = "auth_date";

const SECRET_KEY_LABEL: &[u8] = b"WebAppData";

/// Verification failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InitDataError {
    /// `hash` missing, empty, or not matching the payload.
    #[error("init data signature is missing or invalid")]
    AuthInvalid,
    /// Signature is fine but `user` is absent or not a usable user object.
    #[error("init data user payload is missing or malformed")]
    AuthMalformed,
}

/// Decoded init data, signature not yet checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitData {
    /// Signed fields, ordered by key (byte order).
    fields: BTreeMap<String, String>,
    hash: Option<String>,
}

impl InitData {
    /// Decode the query string. Percent-escapes and `+` are decoded, blank
    /// values are kept, and empty segments (`a=1&&b=2`) are skipped.
    pub fn parse(raw: &str) -> Self {
        let mut fields = BTreeMap::new();
        let mut hash = None;

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            if key == HASH_FIELD {
                hash = Some(value.into_owned());
            } else {
                fields.insert(key.into_owned(), value.into_owned());
            }
        }

        Self { fields, hash }
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref().filter(|h| !h.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// `auth_date` as Unix seconds, when present and numeric.
    pub fn auth_date(&self) -> Option<i64> {
        self.get(AUTH_DATE_FIELD)?.parse().ok()
    }

    /// Sorted `key=value` lines joined by `\n`, excluding `hash`.
    pub fn data_check_string(&self) -> String {
        self.fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check the signature against `bot_token`, then decode `user`.
    pub fn verify(&self, bot_token: &str) -> Result<ParsedUser, InitDataError> {
        let received = self.hash().ok_or(InitDataError::AuthInvalid)?;
        let expected = sign_data_check_string(&self.data_check_string(), bot_token);

        // Exact lowercase hex; an uppercase hash is a mismatch.
        if !constant_time_eq(expected.as_bytes(), received.as_bytes()) {
            return Err(InitDataError::AuthInvalid);
        }

        self.decode_user()
    }

    /// Decode `user` without looking at the signature.
    pub fn user_unverified(&self) -> Result<UnverifiedUser, InitDataError> {
        self.decode_user().map(UnverifiedUser::new)
    }

    fn decode_user(&self) -> Result<ParsedUser, InitDataError> {
        let raw = self.get(USER_FIELD).ok_or(InitDataError::AuthMalformed)?;
        serde_json::from_str(raw).map_err(|_| InitDataError::AuthMalformed)
    }
}

/// `HMAC-SHA256(key = "WebAppData", msg = bot_token)`
pub fn secret_key(bot_token: &str) -> [u8; 32] {
    hmac_sha256(SECRET_KEY_LABEL, bot_token.as_bytes())
}

/// Lowercase hex signature Telegram would attach to `data_check_string`.
pub fn sign_data_check_string(data_check_string: &str, bot_token: &str) -> String {
    to_hex(&hmac_sha256(
        &secret_key(bot_token),
        data_check_string.as_bytes(),
    ))
}

/// Verify raw init data and return the signed user.
pub fn verify(init_data: &str, bot_token: &str) -> Result<ParsedUser, InitDataError> {
    InitData::parse(init_data).verify(bot_token)
}

/// Decode the user WITHOUT verifying the signature.
///
/// Only for deployments that explicitly enable the insecure fallback; the
/// result is wrapped so it cannot be mistaken for a verified user.
pub fn extract_unverified(init_data: &str) -> Result<UnverifiedUser, InitDataError> {
    InitData::parse(init_data).user_unverified()
}
