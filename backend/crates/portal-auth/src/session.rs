//! Session Manager
//!
//! Each account holds at most one live refresh token:
//!
//! ```text
//!   NoSession ──login──▶ Active(C)
//!   Active(C) ──login──▶ Active(C')      (C is invalidated)
//!   Active(C) ──renew(C)──▶ Active(C')
//!   Active(C) ──logout──▶ NoSession
//! ```
//!
//! Renewal replaces the stored token with a compare-and-swap against the
//! presented one, so a token can be redeemed at most once.

use crate::context::AuthenticatedUser;
use crate::error::{AuthError, AuthResult};
use crate::password::{verify_password, PasswordPolicy};
use crate::repository::UserRepository;
use crate::token::TokenCodec;
use chrono::{DateTime, Utc};
use portal_commons::{User, UserId};
use std::sync::Arc;

/// Freshly minted access and refresh tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The account as stored after login (holds the new refresh token)
    pub user: User,
    pub tokens: TokenPair,
}

pub struct SessionManager {
    repo: Arc<dyn UserRepository>,
    codec: TokenCodec,
    policy: PasswordPolicy,
}

impl SessionManager {
    pub fn new(repo: Arc<dyn UserRepository>, codec: TokenCodec, policy: PasswordPolicy) -> Self {
        Self {
            repo,
            codec,
            policy,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Authenticate by username or email and open a new session.
    ///
    /// Any previously issued refresh token stops being redeemable.
    pub async fn login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        password: &str,
    ) -> AuthResult<LoginOutcome> {
        let username = username.map(str::trim).filter(|u| !u.is_empty());
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        if username.is_none() && email.is_none() {
            return Err(AuthError::MissingIdentifier);
        }

        let mut user = self
            .repo
            .find_by_username_or_email(username, email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &user.password_hash).await? {
            log::warn!("Failed login attempt for user {}", user.username);
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.mint_pair(&user)?;
        if !self
            .repo
            .set_refresh_token(&user.id, Some(tokens.refresh_token.clone()))
            .await?
        {
            return Err(AuthError::UserNotFound);
        }
        user.refresh_token = Some(tokens.refresh_token.clone());

        log::info!("User {} logged in", user.username);
        Ok(LoginOutcome { user, tokens })
    }

    /// Exchange the live refresh token for a new pair.
    pub async fn renew(&self, presented: Option<&str>) -> AuthResult<TokenPair> {
        let presented = presented
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.codec.verify_refresh(presented)?;
        let user_id = UserId::new(claims.sub);

        let user = self
            .repo
            .get_user_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if user.refresh_token.as_deref() != Some(presented) {
            log::warn!("Rejected stale refresh token for user {}", user.username);
            return Err(AuthError::RefreshTokenReused);
        }

        let tokens = self.mint_pair(&user)?;
        self.repo
            .replace_refresh_token(&user.id, presented, tokens.refresh_token.clone())
            .await?;

        log::debug!("Renewed session for user {}", user.username);
        Ok(tokens)
    }

    /// Close the session. Idempotent.
    pub async fn logout(&self, user_id: &UserId) -> AuthResult<()> {
        if !self.repo.set_refresh_token(user_id, None).await? {
            log::debug!("Logout for unknown user {}", user_id);
        }
        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: &UserId,
        old_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        let user = self
            .repo
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(old_password, &user.password_hash).await? {
            return Err(AuthError::InvalidOldPassword);
        }

        self.policy.validate(new_password)?;
        let hash = self.policy.hash(new_password).await?;

        if !self.repo.set_password_hash(user_id, hash).await? {
            return Err(AuthError::UserNotFound);
        }

        log::info!("Password changed for user {}", user.username);
        Ok(())
    }

    /// The request gate: decode an access token into the caller identity.
    pub fn authenticate_access(&self, token: &str) -> AuthResult<AuthenticatedUser> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.codec.verify_access(token).map(AuthenticatedUser::from)
    }

    fn mint_pair(&self, user: &User) -> AuthResult<TokenPair> {
        let access = self.codec.issue_access(user)?;
        let refresh = self.codec.issue_refresh(&user.id)?;
        Ok(TokenPair {
            access_token: access.token,
            access_expires_at: access.expires_at,
            refresh_token: refresh.token,
            refresh_expires_at: refresh.expires_at,
        })
    }
}
