//! Repository Traits
//!
//! Persistence interfaces; PostgreSQL implementation lives in `infra`.

use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::error::AuthResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_telegram_id(&self, telegram_id: i64) -> AuthResult<Option<User>>;

    /// Insert `user`; if the Telegram id already exists, refresh its profile
    /// fields instead. Returns the stored row, so on conflict the existing
    /// ids, role and status win.
    async fn upsert(&self, user: &User) -> AuthResult<User>;

    async fn update(&self, user: &User) -> AuthResult<()>;
}

#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Unexpired session by id. A fingerprint mismatch is an error, not `None`.
    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>>;

    /// Persist activity timestamp and expiry
    async fn update(&self, session: &AuthSession) -> AuthResult<()>;

    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Delete all sessions of a user, optionally keeping one
    async fn delete_all_for_user(&self, user_id: &UserId, except: Option<Uuid>) -> AuthResult<u64>;

    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Everything the HTTP layer needs from a single backing store.
pub trait AuthRepository:
    UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}

impl<T> AuthRepository for T where
    T: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}
