//! Listing Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::entity::listing::ModerationError;
use crate::domain::photo::PhotoError;
use crate::domain::value_object::{ListingStatus, ListingTextError, PriceError};
use crate::infra::storage::StorageError;

pub type ListingResult<T> = Result<T, ListingError>;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("{0}")]
    Validation(String),

    #[error("Listing not found")]
    NotFound,

    #[error("You can only upload photos to your own listings")]
    NotOwner,

    #[error("Only moderators can review listings")]
    NotModerator,

    #[error("Moderation requires a verified Telegram identity")]
    UnverifiedIdentity,

    #[error("Maximum {max} photos per listing. Currently {existing} photos exist.")]
    TooManyPhotos { existing: usize, max: usize },

    #[error("{0}")]
    InvalidPhoto(PhotoError),

    #[error("Photo could not be processed")]
    ImageProcessing(#[from] image::ImageError),

    #[error("Listing cannot move from {from} to {to}")]
    InvalidTransition {
        from: ListingStatus,
        to: ListingStatus,
    },

    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    #[error("Photo storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ListingError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ListingError::Validation(_)
            | ListingError::TooManyPhotos { .. }
            | ListingError::ImageProcessing(_)
            | ListingError::Multipart(_) => ErrorKind::BadRequest,
            ListingError::InvalidPhoto(PhotoError::TooLarge { .. }) => ErrorKind::PayloadTooLarge,
            ListingError::InvalidPhoto(_) => ErrorKind::BadRequest,
            ListingError::NotFound => ErrorKind::NotFound,
            ListingError::NotOwner
            | ListingError::NotModerator
            | ListingError::UnverifiedIdentity => ErrorKind::Forbidden,
            ListingError::InvalidTransition { .. } => ErrorKind::Conflict,
            ListingError::Storage(_) => ErrorKind::BadGateway,
            ListingError::Database(_) | ListingError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            ListingError::Database(_) | ListingError::Internal(_) => {
                "Internal server error".to_string()
            }
            ListingError::Storage(_) => "Photo storage is unavailable".to_string(),
            other => other.to_string(),
        };
        let err = AppError::new(self.kind(), message);
        match self {
            ListingError::UnverifiedIdentity => err.with_action("Reopen the marketplace from Telegram"),
            ListingError::Storage(_) => err.with_action("Try again later"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            ListingError::Database(e) => {
                tracing::error!(error = %e, "Listings database error");
            }
            ListingError::Internal(msg) => {
                tracing::error!(message = %msg, "Listings internal error");
            }
            ListingError::Storage(e) => {
                tracing::error!(error = %e, "Photo storage error");
            }
            ListingError::NotOwner | ListingError::NotModerator => {
                tracing::warn!(error = %self, "Forbidden listing operation");
            }
            _ => {
                tracing::debug!(error = %self, "Listing error");
            }
        }
    }
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<ListingTextError> for ListingError {
    fn from(err: ListingTextError) -> Self {
        ListingError::Validation(err.to_string())
    }
}

impl From<PriceError> for ListingError {
    fn from(err: PriceError) -> Self {
        ListingError::Validation(err.to_string())
    }
}

impl From<PhotoError> for ListingError {
    fn from(err: PhotoError) -> Self {
        ListingError::InvalidPhoto(err)
    }
}

impl From<ModerationError> for ListingError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::Transition { from, to } => {
                ListingError::InvalidTransition { from, to }
            }
            ModerationError::MissingReason => {
                ListingError::Validation("A rejection reason is required".to_string())
            }
            ModerationError::ReasonTooLong { length } => ListingError::Validation(format!(
                "Rejection reason is too long ({length} chars)"
            )),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ListingError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ListingError::Multipart(err.body_text())
    }
}
