use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use std::fmt;
use thiserror::Error;

use crate::models::UserId;

/// Key used for a lookup that found nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Id(UserId),
    Email(String),
}

impl fmt::Display for UserLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserLookup::Id(id) => write!(f, "id {}", id),
            UserLookup::Email(email) => write!(f, "email {}", email),
        }
    }
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found by {0}")]
    NotFound(UserLookup),

    #[error("Email '{0}' is already in use")]
    EmailExists(String),

    /// A storage constraint rejected the write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            UserError::EmailExists(_) => AppError::Conflict("Email already in use".to_string()),
            UserError::ConstraintViolation(_)
            | UserError::PasswordHash(_)
            | UserError::Internal(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
