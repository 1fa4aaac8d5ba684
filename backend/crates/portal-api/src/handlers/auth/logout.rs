//! POST /api/v1/users/logout

use actix_web::{web, HttpResponse};
use portal_auth::{
    create_logout_cookie, AuthenticatedUser, CookieConfig, SessionManager, ACCESS_COOKIE_NAME,
    REFRESH_COOKIE_NAME,
};
use serde_json::json;

use crate::error::ApiResult;
use crate::models::ApiResponse;

/// Clears the stored refresh token and both cookies.
pub async fn logout_handler(
    user: AuthenticatedUser,
    session: web::Data<SessionManager>,
    cookies: web::Data<CookieConfig>,
) -> ApiResult<HttpResponse> {
    session.logout(&user.user_id).await?;
    log::info!("User {} logged out", user.username);

    Ok(HttpResponse::Ok()
        .cookie(create_logout_cookie(ACCESS_COOKIE_NAME, &cookies))
        .cookie(create_logout_cookie(REFRESH_COOKIE_NAME, &cookies))
        .json(ApiResponse::ok(json!({}), "User logged out")))
}
