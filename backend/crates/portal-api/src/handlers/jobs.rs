//! Job catalog handlers
//!
//! - POST /api/v1/jobs - Post a job (requires a session)
//! - GET /api/v1/jobs - List job summaries
//! - GET /api/v1/jobs/{job_id} - Full job posting

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use portal_auth::AuthenticatedUser;

use super::{ok, respond};
use crate::error::ApiResult;
use crate::models::CreateJobRequest;
use crate::services::JobService;

pub async fn create_job_handler(
    user: AuthenticatedUser,
    jobs: web::Data<JobService>,
    body: web::Json<CreateJobRequest>,
) -> ApiResult<HttpResponse> {
    let job = jobs.create(&user.user_id, body.into_inner()).await?;
    Ok(respond(StatusCode::CREATED, job, "Job created successfully"))
}

pub async fn list_jobs_handler(jobs: web::Data<JobService>) -> ApiResult<HttpResponse> {
    let summaries = jobs.list().await?;
    Ok(ok(summaries, "Jobs fetched successfully"))
}

pub async fn get_job_handler(
    jobs: web::Data<JobService>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let job = jobs.get(&path.into_inner()).await?;
    Ok(ok(job, "Job fetched successfully"))
}
