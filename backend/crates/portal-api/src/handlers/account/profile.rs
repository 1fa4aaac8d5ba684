use actix_web::{web, HttpResponse};
use portal_auth::AuthenticatedUser;

use crate::error::ApiResult;
use crate::handlers::ok;
use crate::models::{QualificationRequest, UpdateAccountRequest, UserInfo};
use crate::services::AccountService;

/// GET /api/v1/users/current-user
pub async fn current_user_handler(
    user: AuthenticatedUser,
    accounts: web::Data<AccountService>,
) -> ApiResult<HttpResponse> {
    let current = accounts.current_user(&user.user_id).await?;
    Ok(ok(UserInfo::from(&current), "Current user fetched successfully"))
}

/// PATCH /api/v1/users/update-account
pub async fn update_account_handler(
    user: AuthenticatedUser,
    accounts: web::Data<AccountService>,
    body: web::Json<UpdateAccountRequest>,
) -> ApiResult<HttpResponse> {
    let updated = accounts.update_account(&user.user_id, body.into_inner()).await?;
    Ok(ok(UserInfo::from(&updated), "Account details updated successfully"))
}

/// POST /api/v1/users/qualifications
pub async fn add_qualification_handler(
    user: AuthenticatedUser,
    accounts: web::Data<AccountService>,
    body: web::Json<QualificationRequest>,
) -> ApiResult<HttpResponse> {
    let updated = accounts.add_qualification(&user.user_id, body.into_inner()).await?;
    Ok(ok(UserInfo::from(&updated), "Qualification added successfully"))
}
