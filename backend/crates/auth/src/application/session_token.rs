//! Session cookie tokens
//!
//! Format: `<session uuid>.<base64url(HMAC-SHA256(secret, session uuid))>`.
//! The signature lets us reject forged cookies before touching the database.

use platform::crypto::{constant_time_eq, from_base64url, hmac_sha256, to_base64url};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

pub fn issue(session_id: Uuid, secret: &[u8; 32]) -> String {
    let id = session_id.to_string();
    let signature = hmac_sha256(secret, id.as_bytes());
    format!("{}.{}", id, to_base64url(&signature))
}

pub fn parse(token: &str, secret: &[u8; 32]) -> AuthResult<Uuid> {
    let (id, signature_b64) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let signature = from_base64url(signature_b64).map_err(|_| AuthError::SessionInvalid)?;
    let expected = hmac_sha256(secret, id.as_bytes());
    if !constant_time_eq(&expected, &signature) {
        return Err(AuthError::SessionInvalid);
    }

    id.parse().map_err(|_| AuthError::SessionInvalid)
}
