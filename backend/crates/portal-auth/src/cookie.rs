// Cookie handling for HttpOnly token cookies
//
// Both tokens travel as HttpOnly cookies in addition to the JSON body, so
// browser clients never have to touch them from script.

use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use chrono::{DateTime, Utc};

/// Cookie name for the access token
pub const ACCESS_COOKIE_NAME: &str = "accessToken";

/// Cookie name for the refresh token
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Configuration for token cookies
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Whether to set the Secure flag (false only for plain-HTTP development)
    pub secure: bool,
    pub path: String,
    pub same_site: SameSite,
    /// Domain (None = current domain)
    pub domain: Option<String>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            path: "/".to_string(),
            same_site: SameSite::Lax,
            domain: None,
        }
    }
}

impl CookieConfig {
    pub fn with_secure(secure: bool) -> Self {
        Self {
            secure,
            ..Default::default()
        }
    }
}

/// Create an HttpOnly cookie named `name` holding `token` until `expires_at`.
pub fn create_token_cookie<'a>(
    name: &'static str,
    token: &str,
    expires_at: DateTime<Utc>,
    config: &CookieConfig,
) -> Cookie<'a> {
    let expires = OffsetDateTime::from_unix_timestamp(expires_at.timestamp()).unwrap_or_else(|_| {
        log::warn!(
            "Cookie expiry timestamp {} is out of range; falling back to a session cookie lifetime of 24 h",
            expires_at.timestamp()
        );
        OffsetDateTime::now_utc() + actix_web::cookie::time::Duration::hours(24)
    });

    let mut cookie = Cookie::build(name, token.to_string())
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .expires(expires)
        .finish();

    if let Some(ref domain) = config.domain {
        cookie.set_domain(domain.clone());
    }

    cookie
}

/// Create an already-expired replacement for the cookie named `name`.
pub fn create_logout_cookie<'a>(name: &'static str, config: &CookieConfig) -> Cookie<'a> {
    let mut cookie = Cookie::build(name, "")
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .finish();

    if let Some(ref domain) = config.domain {
        cookie.set_domain(domain.clone());
    }

    cookie
}

/// Non-empty value of the cookie named `name`, if the request carries one.
pub fn extract_cookie_token(req: &HttpRequest, name: &str) -> Option<String> {
    req.cookie(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
