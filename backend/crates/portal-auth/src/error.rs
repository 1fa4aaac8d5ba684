// Authentication error types

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Neither username nor email was supplied at login
    #[error("username or email is required")]
    MissingIdentifier,

    #[error("User does not exist")]
    UserNotFound,

    #[error("Invalid user credentials")]
    InvalidCredentials,

    /// No token in the cookie, header or body
    #[error("Unauthorized request")]
    MissingToken,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    /// An access token was presented where a refresh token is required, or
    /// the other way round
    #[error("Wrong token type, expected {0} token")]
    WrongTokenType(String),

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// The presented refresh token is not the one on record
    #[error("Refresh token is expired or used")]
    RefreshTokenReused,

    #[error("Invalid old password")]
    InvalidOldPassword,

    #[error("{0}")]
    WeakPassword(String),

    /// Username or email already taken
    #[error("User with email or username already exists")]
    AlreadyExists(String),

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Token encoding error: {0}")]
    TokenEncoding(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl AuthError {
    /// True for failures caused by the presented token rather than the server.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::MalformedToken(_)
                | AuthError::TokenExpired
                | AuthError::InvalidSignature
                | AuthError::WrongTokenType(_)
                | AuthError::InvalidRefreshToken
                | AuthError::RefreshTokenReused
        )
    }
}
