//! Job catalog

use std::sync::Arc;

use portal_commons::{Job, JobId, JobSummary, UserId};
use portal_store::{EntityStore, JobStore};

use super::run_blocking;
use crate::error::{ApiError, ApiResult};
use crate::models::CreateJobRequest;

pub struct JobService {
    jobs: Arc<JobStore>,
}

impl JobService {
    pub fn new(jobs: Arc<JobStore>) -> Self {
        Self { jobs }
    }

    pub async fn create(&self, posted_by: &UserId, request: CreateJobRequest) -> ApiResult<Job> {
        let title = non_blank(request.title);
        let company = non_blank(request.company);
        let (Some(title), Some(company)) = (title, company) else {
            return Err(ApiError::bad_request("Title and company are required"));
        };

        let job = Job {
            id: JobId::generate(),
            title,
            company,
            location: request.location.unwrap_or_default().trim().to_string(),
            job_type: request.job_type.unwrap_or_default().trim().to_string(),
            description: request.description.unwrap_or_default(),
            impression: request.impression.unwrap_or_default(),
            posted_by: posted_by.clone(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let jobs = self.jobs.clone();
        let stored = job.clone();
        run_blocking(move || jobs.insert(&stored).map_err(ApiError::from)).await?;

        log::info!("Job {} '{}' posted by {}", job.id, job.title, posted_by);
        Ok(job)
    }

    pub async fn get(&self, job_id: &str) -> ApiResult<Job> {
        let jobs = self.jobs.clone();
        let id = JobId::new(job_id.trim());
        run_blocking(move || jobs.get(&id).map_err(ApiError::from))
            .await?
            .ok_or_else(|| ApiError::not_found("Job not found"))
    }

    /// Every job as a summary, newest first.
    pub async fn list(&self) -> ApiResult<Vec<JobSummary>> {
        let jobs = self.jobs.clone();
        let all = run_blocking(move || jobs.list().map_err(ApiError::from)).await?;
        Ok(all.iter().map(JobSummary::from).collect())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
