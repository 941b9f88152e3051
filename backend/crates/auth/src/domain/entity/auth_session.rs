//! Auth Session Entity
//!
//! Server-side session referenced by a signed cookie token.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use kernel::principal::{Principal, Role};
use uuid::Uuid;

use crate::domain::value_object::public_id::PublicId;

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: Uuid,
    pub user_id: UserId,
    pub public_id: PublicId,
    /// Role at session creation
    pub user_role: Role,
    /// Whether the init data that opened this session carried a valid
    /// Telegram signature
    pub identity_verified: bool,
    /// Unix ms
    pub expires_at_ms: i64,
    /// SHA-256 of the User-Agent
    pub client_fingerprint_hash: Vec<u8>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

/// Session owner and client data, grouped to keep `AuthSession::new` short.
pub struct NewSession {
    pub user_id: UserId,
    pub public_id: PublicId,
    pub user_role: Role,
    pub identity_verified: bool,
    pub fingerprint_hash: Vec<u8>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl AuthSession {
    /// TTL comes from configuration.
    pub fn new(new: NewSession, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id: new.user_id,
            public_id: new.public_id,
            user_role: new.user_role,
            identity_verified: new.identity_verified,
            expires_at_ms: (now + ttl).timestamp_millis(),
            client_fingerprint_hash: new.fingerprint_hash,
            client_ip: new.client_ip,
            user_agent: new.user_agent,
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    pub fn remaining_ms(&self) -> i64 {
        (self.expires_at_ms - Utc::now().timestamp_millis()).max(0)
    }

    /// Sliding expiry: once less than half of `ttl` remains, push the
    /// deadline out to `now + ttl`.
    pub fn extend_if_needed(&mut self, ttl: Duration) {
        let now = Utc::now();
        if self.expires_at_ms < (now + ttl / 2).timestamp_millis() {
            self.expires_at_ms = (now + ttl).timestamp_millis();
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id,
            public_id: self.public_id.to_string(),
            role: self.user_role,
            identity_verified: self.identity_verified,
        }
    }
}
