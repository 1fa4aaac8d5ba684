//! Session handlers
//!
//! Tokens are returned in the JSON body and as HttpOnly cookies.
//!
//! ## Endpoints
//! - POST /api/v1/users/register - Create an account (JSON or multipart)
//! - POST /api/v1/users/login - Authenticate and get a token pair
//! - POST /api/v1/users/refresh-token - Exchange the refresh token
//! - POST /api/v1/users/logout - End the session
//! - POST /api/v1/users/change-password - Replace the password

mod change_password;
mod login;
mod logout;
mod refresh;
mod register;

pub use change_password::change_password_handler;
pub use login::login_handler;
pub use logout::logout_handler;
pub use refresh::refresh_handler;
pub use register::register_handler;

use actix_web::HttpResponseBuilder;
use portal_auth::{create_token_cookie, CookieConfig, TokenPair, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};

/// Attach both token cookies to `builder`.
pub(crate) fn set_token_cookies(
    builder: &mut HttpResponseBuilder,
    tokens: &TokenPair,
    config: &CookieConfig,
) {
    builder
        .cookie(create_token_cookie(
            ACCESS_COOKIE_NAME,
            &tokens.access_token,
            tokens.access_expires_at,
            config,
        ))
        .cookie(create_token_cookie(
            REFRESH_COOKIE_NAME,
            &tokens.refresh_token,
            tokens.refresh_expires_at,
            config,
        ));
}
