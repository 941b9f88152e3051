//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod current_user;
pub mod session_token;
pub mod sign_out;
pub mod telegram_sign_in;

pub use check_session::{CheckSessionUseCase, SessionInfoOutput};
pub use config::{AuthConfig, TelegramAuthMode};
pub use current_user::CurrentUserUseCase;
pub use sign_out::SignOutUseCase;
pub use telegram_sign_in::{TelegramSignInInput, TelegramSignInOutput, TelegramSignInUseCase};
