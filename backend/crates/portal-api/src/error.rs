//! API error taxonomy
//!
//! Every handler returns `Result<HttpResponse, ApiError>`; lower-layer errors
//! convert through `From`, so `?` works across crate boundaries.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use portal_auth::AuthError;
use portal_store::StorageError;
use thiserror::Error;

use crate::image_host::ImageHostError;
use crate::models::ErrorBody;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Details are logged, never sent to the client
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    /// Message safe to show the client.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(details) = self {
            log::error!("Request failed: {}", details);
        }
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorBody::new(status, self.public_message()))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingIdentifier
            | AuthError::InvalidOldPassword
            | AuthError::WeakPassword(_) => ApiError::BadRequest(err.to_string()),
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::TokenExpired
            | AuthError::InvalidRefreshToken
            | AuthError::RefreshTokenReused => ApiError::Unauthorized(err.to_string()),
            AuthError::MalformedToken(_)
            | AuthError::InvalidSignature
            | AuthError::WrongTokenType(_) => {
                ApiError::Unauthorized("Invalid refresh token".to_string())
            },
            AuthError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AuthError::HashingError(_)
            | AuthError::TokenEncoding(_)
            | AuthError::DatabaseError(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueConstraintViolation(field) => {
                ApiError::Conflict(format!("A user with this {} already exists", field))
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ImageHostError> for ApiError {
    fn from(err: ImageHostError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
