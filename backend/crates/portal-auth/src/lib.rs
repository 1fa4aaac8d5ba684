// Portal Authentication Library
// Session lifecycle, password hashing, JWT issuing/validation and the
// request gate extractor.

pub mod context;
pub mod cookie;
pub mod error;
pub mod extractor;
pub mod password;
pub mod repository;
pub mod session;
pub mod token;

#[cfg(test)]
pub(crate) mod test_utils;

pub use context::AuthenticatedUser;
pub use cookie::{
    create_logout_cookie, create_token_cookie, extract_cookie_token, CookieConfig,
    ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME,
};
pub use error::{AuthError, AuthResult};
pub use extractor::AuthExtractError;
pub use password::PasswordPolicy;
pub use repository::UserRepository;
pub use session::{LoginOutcome, SessionManager, TokenPair};
pub use token::{IssuedToken, TokenClaims, TokenCodec, TokenType};
