//! Telegram Authentication
//!
//! Clean Architecture structure:
//! - `domain/` - init data verification, entities, repository traits
//! - `application/` - use cases (Telegram sign-in, sessions, current user)
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Security Model
//! - Identity comes only from Mini App init data signed with the bot token
//!   (HMAC-SHA256, constant-time comparison)
//! - Signed `auth_date` older than the configured maximum is rejected
//! - The unverified fallback is opt-in, audited, and marks sessions as
//!   unverified
//! - Sessions are server-side, referenced by an HMAC-signed cookie and bound
//!   to the client fingerprint (User-Agent)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::config::{AuthConfig, TelegramAuthMode};
pub use domain::init_data::{InitDataError, extract_unverified, verify};
pub use domain::value_object::telegram_user::{ParsedUser, UnverifiedUser};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{auth_router, auth_router_generic};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
