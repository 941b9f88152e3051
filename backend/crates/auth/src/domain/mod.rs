//! Domain Layer
//!
//! Init data verification, entities, value objects and repository traits.

pub mod entity;
pub mod init_data;
pub mod repository;
pub mod value_object;

pub use entity::{auth_session::AuthSession, user::User};
pub use init_data::{InitData, InitDataError, extract_unverified, verify};
pub use repository::{AuthRepository, AuthSessionRepository, UserRepository};
pub use value_object::telegram_user::{ParsedUser, UnverifiedUser};
