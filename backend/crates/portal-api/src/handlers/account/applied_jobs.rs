use actix_web::{web, HttpResponse};
use portal_auth::AuthenticatedUser;

use crate::error::ApiResult;
use crate::handlers::ok;
use crate::models::{ApplyJobRequest, UserInfo};
use crate::services::AccountService;

/// GET /api/v1/users/applied-jobs
pub async fn applied_jobs_handler(
    user: AuthenticatedUser,
    accounts: web::Data<AccountService>,
) -> ApiResult<HttpResponse> {
    let jobs = accounts.applied_jobs(&user.user_id).await?;
    Ok(ok(jobs, "Applied jobs fetched successfully"))
}

/// POST /api/v1/users/applied-jobs
pub async fn apply_job_handler(
    user: AuthenticatedUser,
    accounts: web::Data<AccountService>,
    body: web::Json<ApplyJobRequest>,
) -> ApiResult<HttpResponse> {
    let updated = accounts.apply_to_job(&user.user_id, body.into_inner()).await?;
    Ok(ok(UserInfo::from(&updated), "Job applied successfully"))
}
