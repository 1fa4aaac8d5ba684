//! POST /api/v1/users/refresh-token

use actix_web::{web, HttpRequest, HttpResponse};
use portal_auth::{extract_cookie_token, CookieConfig, SessionManager, REFRESH_COOKIE_NAME};

use super::set_token_cookies;
use crate::error::ApiResult;
use crate::models::{ApiResponse, RefreshRequest, TokenResponse};

/// Redeems the refresh token (cookie first, then JSON body) for a new pair.
pub async fn refresh_handler(
    req: HttpRequest,
    session: web::Data<SessionManager>,
    cookies: web::Data<CookieConfig>,
    body: Option<web::Json<RefreshRequest>>,
) -> ApiResult<HttpResponse> {
    let presented = extract_cookie_token(&req, REFRESH_COOKIE_NAME)
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token));

    let tokens = session.renew(presented.as_deref()).await?;

    let mut response = HttpResponse::Ok();
    set_token_cookies(&mut response, &tokens, &cookies);
    Ok(response.json(ApiResponse::ok(TokenResponse::from(&tokens), "Access token refreshed")))
}
