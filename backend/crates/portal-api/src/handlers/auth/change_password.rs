//! POST /api/v1/users/change-password

use actix_web::{web, HttpResponse};
use portal_auth::{AuthenticatedUser, SessionManager};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ok;
use crate::models::ChangePasswordRequest;

pub async fn change_password_handler(
    user: AuthenticatedUser,
    session: web::Data<SessionManager>,
    body: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let (Some(old_password), Some(new_password)) = (body.old_password, body.new_password) else {
        return Err(ApiError::bad_request("Old and new password are required"));
    };

    session.change_password(&user.user_id, &old_password, &new_password).await?;
    Ok(ok(json!({}), "Password changed successfully"))
}
