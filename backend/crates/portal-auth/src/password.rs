// Password hashing and validation module

use crate::error::{AuthError, AuthResult};
use bcrypt::{hash, verify};
use portal_configs::AuthSettings;

/// Length bounds and bcrypt cost applied to every password the portal stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    /// bcrypt ignores input past 72 bytes
    pub max_length: usize,
    pub bcrypt_cost: u32,
}

impl PasswordPolicy {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self {
            min_length: settings.min_password_length,
            max_length: settings.max_password_length,
            bcrypt_cost: settings.bcrypt_cost,
        }
    }

    /// Checks the length bounds, measured in bytes.
    pub fn validate(&self, password: &str) -> AuthResult<()> {
        if password.len() < self.min_length {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        if password.len() > self.max_length {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at most {} characters",
                self.max_length
            )));
        }

        Ok(())
    }

    pub async fn hash(&self, password: &str) -> AuthResult<String> {
        hash_password(password, self.bcrypt_cost).await
    }
}

/// Hash a password with bcrypt on the blocking thread pool.
pub async fn hash_password(password: &str, cost: u32) -> AuthResult<String> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| AuthError::HashingError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashingError(format!("Task join error: {}", e)))?
}

/// Verify a password against a bcrypt hash on the blocking thread pool.
///
/// `Ok(false)` means the password does not match.
pub async fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || {
        verify(password, &hash).map_err(|e| AuthError::HashingError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashingError(format!("Task join error: {}", e)))?
}
