//! Identity attached to a request by the gate.

use crate::token::TokenClaims;
use portal_commons::UserId;
use serde::Serialize;

/// Caller identity decoded from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub fullname: String,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: UserId::new(claims.sub),
            username: claims.username.unwrap_or_default(),
            email: claims.email.unwrap_or_default(),
            fullname: claims.fullname.unwrap_or_default(),
        }
    }
}
