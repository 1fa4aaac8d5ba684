//! Session endpoint models

use serde::{Deserialize, Serialize};

use super::UserInfo;

/// Login body: one of `username` / `email`, plus `password`
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// Token pair as returned in response bodies (also set as HttpOnly cookies)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    /// RFC3339
    pub access_token_expires_at: String,
    pub refresh_token: String,
    /// RFC3339
    pub refresh_token_expires_at: String,
}

impl From<&portal_auth::TokenPair> for TokenResponse {
    fn from(pair: &portal_auth::TokenPair) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            access_token_expires_at: pair.access_expires_at.to_rfc3339(),
            refresh_token: pair.refresh_token.clone(),
            refresh_token_expires_at: pair.refresh_expires_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserInfo,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}
