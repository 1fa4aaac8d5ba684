// JWT issuing and validation
//
// Access and refresh tokens are signed with different HS256 secrets. Refresh
// tokens carry a random `jti`, so two refresh tokens are never equal even
// when minted in the same second.

use crate::error::{AuthError, AuthResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use portal_commons::{User, UserId};
use portal_configs::defaults::{MAX_ACCESS_TOKEN_EXPIRY_MINUTES, MAX_REFRESH_TOKEN_EXPIRY_DAYS};
use portal_configs::AuthSettings;
use serde::{Deserialize, Serialize};

/// Issuer claim written into every portal token
pub const PORTAL_ISSUER: &str = "portal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by portal tokens.
///
/// Access tokens carry the identity fields; refresh tokens carry only the
/// subject and a unique `jti`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub token_type: TokenType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// A signed token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Mints and verifies access and refresh tokens.
///
/// Built once from configuration at startup and shared as immutable
/// application data.
#[derive(Clone)]
pub struct TokenCodec {
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(
        access_secret: &str,
        access_ttl: Duration,
        refresh_secret: &str,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access: SigningKeys::from_secret(access_secret),
            refresh: SigningKeys::from_secret(refresh_secret),
            access_ttl,
            refresh_ttl,
        }
    }

    /// TTLs are clamped to the range `ServerConfig::validate` accepts.
    pub fn from_settings(settings: &AuthSettings) -> Self {
        let access_minutes = settings
            .access_token_expiry_minutes
            .clamp(1, MAX_ACCESS_TOKEN_EXPIRY_MINUTES);
        let refresh_days = settings
            .refresh_token_expiry_days
            .clamp(1, MAX_REFRESH_TOKEN_EXPIRY_DAYS);
        Self::new(
            &settings.access_token_secret,
            Duration::minutes(access_minutes),
            &settings.refresh_token_secret,
            Duration::days(refresh_days),
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Mint an access token carrying the user's identity fields.
    pub fn issue_access(&self, user: &User) -> AuthResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;
        let claims = TokenClaims {
            sub: user.id.to_string(),
            iss: PORTAL_ISSUER.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            token_type: TokenType::Access,
            username: Some(user.username.to_string()),
            email: Some(user.email.clone()),
            fullname: Some(user.fullname.clone()),
            jti: None,
        };
        let token = sign(&claims, &self.access.encoding)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Mint a refresh token for `user_id` with a fresh random `jti`.
    pub fn issue_refresh(&self, user_id: &UserId) -> AuthResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + self.refresh_ttl;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iss: PORTAL_ISSUER.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            token_type: TokenType::Refresh,
            username: None,
            email: None,
            fullname: None,
            jti: Some(uuid::Uuid::new_v4().to_string()),
        };
        let token = sign(&claims, &self.refresh.encoding)?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify_access(&self, token: &str) -> AuthResult<TokenClaims> {
        verify(token, &self.access.decoding, TokenType::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> AuthResult<TokenClaims> {
        verify(token, &self.refresh.decoding, TokenType::Refresh)
    }
}

fn sign(claims: &TokenClaims, key: &EncodingKey) -> AuthResult<String> {
    encode(&Header::new(Algorithm::HS256), claims, key)
        .map_err(|e| AuthError::TokenEncoding(e.to_string()))
}

fn verify(token: &str, key: &DecodingKey, expected: TokenType) -> AuthResult<TokenClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[PORTAL_ISSUER]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let data = decode::<TokenClaims>(token, key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken(e.to_string()),
    })?;

    if data.claims.token_type != expected {
        return Err(AuthError::WrongTokenType(expected.to_string()));
    }

    Ok(data.claims)
}
