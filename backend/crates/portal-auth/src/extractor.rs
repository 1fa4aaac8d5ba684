//! Actix-web extractor for the request gate.
//!
//! The `SessionManager` must be registered as app data:
//!
//! ```rust,ignore
//! App::new()
//!     .app_data(web::Data::new(session_manager))
//!     .route("/me", web::get().to(me));
//!
//! async fn me(user: AuthenticatedUser) -> impl Responder {
//!     // user is guaranteed to be authenticated
//! }
//! ```
//!
//! The access token is read from the `accessToken` cookie first, then from
//! `Authorization: Bearer <token>`. On success the identity is also stored in
//! the request extensions.

use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use std::fmt;
use std::future::{ready, Ready};

use crate::context::AuthenticatedUser;
use crate::cookie::{extract_cookie_token, ACCESS_COOKIE_NAME};
use crate::error::AuthError;
use crate::session::SessionManager;

/// Error type for the gate; renders the standard error envelope.
#[derive(Debug)]
pub struct AuthExtractError {
    inner: AuthError,
}

impl AuthExtractError {
    pub fn new(error: AuthError) -> Self {
        Self { inner: error }
    }

    pub fn inner(&self) -> &AuthError {
        &self.inner
    }
}

impl fmt::Display for AuthExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl ResponseError for AuthExtractError {
    fn status_code(&self) -> StatusCode {
        match &self.inner {
            AuthError::DatabaseError(_) | AuthError::HashingError(_) | AuthError::TokenEncoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::UNAUTHORIZED {
            match &self.inner {
                AuthError::MissingToken => "Unauthorized request".to_string(),
                _ => "Invalid access token".to_string(),
            }
        } else {
            "Something went wrong".to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "status": status.as_u16(),
            "message": message,
        }))
    }
}

impl From<AuthError> for AuthExtractError {
    fn from(error: AuthError) -> Self {
        Self::new(error)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthExtractError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_request(req))
    }
}

fn authenticate_request(req: &HttpRequest) -> Result<AuthenticatedUser, AuthExtractError> {
    if let Some(user) = req.extensions().get::<AuthenticatedUser>() {
        return Ok(user.clone());
    }

    let Some(manager) = req.app_data::<web::Data<SessionManager>>() else {
        log::error!("SessionManager is not registered as app data");
        return Err(AuthError::DatabaseError("session manager not configured".to_string()).into());
    };

    let token = extract_access_token(req).ok_or(AuthError::MissingToken)?;
    let user = manager.authenticate_access(&token).map_err(|e| {
        log::debug!("Rejected access token for {}: {}", req.path(), e);
        AuthExtractError::new(e)
    })?;

    req.extensions_mut().insert(user.clone());
    Ok(user)
}

/// Access token from the cookie, falling back to the Bearer header.
pub fn extract_access_token(req: &HttpRequest) -> Option<String> {
    extract_cookie_token(req, ACCESS_COOKIE_NAME).or_else(|| {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::PasswordPolicy;
    use crate::test_utils::{sample_user, MemoryUserRepo};
    use crate::token::TokenCodec;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use chrono::Duration;
    use std::sync::Arc;

    fn manager() -> web::Data<SessionManager> {
        web::Data::new(SessionManager::new(
            Arc::new(MemoryUserRepo::default()),
            TokenCodec::new("access", Duration::minutes(5), "refresh", Duration::days(1)),
            PasswordPolicy {
                min_length: 1,
                max_length: 72,
                bcrypt_cost: 4,
            },
        ))
    }

    #[actix_web::test]
    async fn test_cookie_token_accepted() {
        let manager = manager();
        let token = manager
            .codec()
            .issue_access(&sample_user("u1", "alice", "a@x.com"))
            .unwrap()
            .token;

        let req = TestRequest::default()
            .app_data(manager.clone())
            .cookie(Cookie::new(ACCESS_COOKIE_NAME, token))
            .to_http_request();

        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(req.extensions().get::<AuthenticatedUser>().is_some());
    }

    #[actix_web::test]
    async fn test_bearer_token_accepted() {
        let manager = manager();
        let token = manager
            .codec()
            .issue_access(&sample_user("u1", "alice", "a@x.com"))
            .unwrap()
            .token;

        let req = TestRequest::default()
            .app_data(manager.clone())
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        assert!(AuthenticatedUser::extract(&req).await.is_ok());
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let req = TestRequest::default().app_data(manager()).to_http_request();
        let err = AuthenticatedUser::extract(&req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.inner(), &AuthError::MissingToken);
    }

    #[actix_web::test]
    async fn test_refresh_token_is_rejected() {
        let manager = manager();
        let refresh = manager
            .codec()
            .issue_refresh(&portal_commons::UserId::new("u1"))
            .unwrap()
            .token;

        let req = TestRequest::default()
            .app_data(manager.clone())
            .insert_header((AUTHORIZATION, format!("Bearer {}", refresh)))
            .to_http_request();

        let err = AuthenticatedUser::extract(&req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_missing_manager_is_internal_error() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc"))
            .to_http_request();
        let err = AuthenticatedUser::extract(&req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
