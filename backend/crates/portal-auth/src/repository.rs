use crate::error::AuthResult;
use portal_commons::{User, UserId};

/// Abstraction over user persistence for the session flows.
///
/// The storage-backed implementation lives in `portal-api` so this crate does
/// not depend on the store.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// First user whose username or email matches, username checked first.
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> AuthResult<Option<User>>;

    /// Persist a new user. Fails with `AuthError::AlreadyExists` when the
    /// username or email is taken.
    async fn create_user(&self, user: User) -> AuthResult<()>;

    /// Overwrite (or clear) the stored refresh token.
    /// Returns `false` when the user does not exist.
    async fn set_refresh_token(&self, user_id: &UserId, token: Option<String>) -> AuthResult<bool>;

    /// Replace the stored refresh token only if it still equals `expected`.
    ///
    /// Fails with `AuthError::RefreshTokenReused` when the stored value
    /// differs and `AuthError::InvalidRefreshToken` when the user is gone.
    async fn replace_refresh_token(
        &self,
        user_id: &UserId,
        expected: &str,
        new_token: String,
    ) -> AuthResult<()>;

    /// Overwrite the password hash. Returns `false` when the user does not exist.
    async fn set_password_hash(&self, user_id: &UserId, password_hash: String) -> AuthResult<bool>;
}
