//! POST /api/v1/users/login

use actix_web::{web, HttpResponse};
use portal_auth::{CookieConfig, SessionManager};

use super::set_token_cookies;
use crate::error::ApiResult;
use crate::models::{ApiResponse, LoginRequest, LoginResponse, TokenResponse, UserInfo};

/// Authenticates by username or email. Any earlier session of the account
/// stops being renewable.
pub async fn login_handler(
    session: web::Data<SessionManager>,
    cookies: web::Data<CookieConfig>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let outcome = session
        .login(body.username.as_deref(), body.email.as_deref(), &body.password)
        .await?;

    let mut response = HttpResponse::Ok();
    set_token_cookies(&mut response, &outcome.tokens, &cookies);

    Ok(response.json(ApiResponse::ok(
        LoginResponse {
            user: UserInfo::from(&outcome.user),
            tokens: TokenResponse::from(&outcome.tokens),
        },
        "User logged in successfully",
    )))
}
