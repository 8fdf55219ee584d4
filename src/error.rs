use crate::services::{
    AuthServiceError, ReferralServiceError, TokenError, UserServiceError,
};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Invalid referral code")]
    InvalidReferralCode,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Already referred by another person")]
    AlreadyReferred,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Referral codes exhausted")]
    ResourceExhausted,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::UsernameTaken => AppError::UsernameTaken,
            UserServiceError::EmailTaken => AppError::EmailTaken,
            UserServiceError::InvalidReferralCode => AppError::InvalidReferralCode,
            UserServiceError::UserNotFound => AppError::UserNotFound,
            UserServiceError::MissingUsername
            | UserServiceError::InvalidEmail
            | UserServiceError::MissingPassword => AppError::Validation(err.to_string()),
            UserServiceError::ReferralCodesExhausted(_) => AppError::ResourceExhausted,
            UserServiceError::HashingError(_) | UserServiceError::RepositoryError(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => AppError::InvalidCredentials,
            AuthServiceError::RepositoryError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ReferralServiceError> for AppError {
    fn from(err: ReferralServiceError) -> Self {
        match err {
            ReferralServiceError::EmailAlreadyExists => AppError::EmailAlreadyExists,
            ReferralServiceError::AlreadyReferred => AppError::AlreadyReferred,
            ReferralServiceError::UserNotFound => AppError::UserNotFound,
            ReferralServiceError::MissingName | ReferralServiceError::InvalidEmail => {
                AppError::Validation(err.to_string())
            }
            ReferralServiceError::RepositoryError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::UsernameTaken
            | AppError::EmailTaken
            | AppError::InvalidReferralCode
            | AppError::EmailAlreadyExists
            | AppError::AlreadyReferred
            | AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": self.to_string() }),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": self.to_string() }),
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": self.to_string() }),
            ),
            AppError::ResourceExhausted => {
                tracing::error!("Request failed: {}", self);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "message": "Unable to allocate a referral code, try again later" }),
                )
            }
            AppError::Internal(ref detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Failures of the bearer-token middleware.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header missing")]
    MissingAuthorizationHeader,
    #[error("Invalid authorization header format")]
    InvalidAuthorizationFormat,
    #[error("Invalid token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingAuthorizationHeader | AuthError::InvalidAuthorizationFormat => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InvalidToken => StatusCode::FORBIDDEN,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
