//! Auth Error Types
//!
//! Auth-specific variants; rendered through `kernel::error::AppError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::init_data::InitDataError;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Init data hash missing or wrong
    #[error("Telegram init data signature is invalid")]
    InitDataInvalid,

    /// Init data authentic, user payload unusable
    #[error("Telegram init data user payload is malformed")]
    InitDataMalformed,

    /// Signed `auth_date` missing or older than the configured maximum
    #[error("Telegram init data has expired")]
    InitDataExpired,

    #[error("User not found")]
    UserNotFound,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Session not found or expired")]
    SessionInvalid,

    #[error("Session fingerprint mismatch")]
    SessionFingerprintMismatch,

    #[error("Missing required header: {0}")]
    MissingHeader(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InitDataInvalid
            | AuthError::InitDataExpired
            | AuthError::SessionInvalid
            | AuthError::SessionFingerprintMismatch => ErrorKind::Unauthorized,
            AuthError::InitDataMalformed | AuthError::MissingHeader(_) => ErrorKind::BadRequest,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::AccountDisabled => ErrorKind::Forbidden,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.client_message());
        match self {
            AuthError::InitDataInvalid | AuthError::InitDataExpired => {
                err.with_action("Reopen the marketplace from Telegram")
            }
            AuthError::SessionInvalid | AuthError::SessionFingerprintMismatch => {
                err.with_action("Sign in again")
            }
            _ => err,
        }
    }

    /// Server-side details stay out of the response body.
    fn client_message(&self) -> String {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InitDataInvalid => {
                tracing::warn!("Rejected Telegram init data with invalid signature");
            }
            AuthError::InitDataMalformed => {
                tracing::info!("Rejected Telegram init data with malformed user payload");
            }
            AuthError::SessionFingerprintMismatch => {
                tracing::warn!("Session fingerprint mismatch detected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<InitDataError> for AuthError {
    fn from(err: InitDataError) -> Self {
        match err {
            InitDataError::AuthInvalid => AuthError::InitDataInvalid,
            InitDataError::AuthMalformed => AuthError::InitDataMalformed,
        }
    }
}

impl From<platform::client::FingerprintError> for AuthError {
    fn from(err: platform::client::FingerprintError) -> Self {
        match err {
            platform::client::FingerprintError::MissingHeader(header) => {
                AuthError::MissingHeader(header)
            }
        }
    }
}
