//! Job postings that users can apply to.

use serde::{Deserialize, Serialize};

use super::{JobId, UserId};

/// A job or internship posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: String,
    /// Long-form description (omitted from summaries).
    #[serde(default)]
    pub description: String,
    /// Long-form company impression (omitted from summaries).
    #[serde(default)]
    pub impression: String,
    pub posted_by: UserId,
    /// Unix millis
    pub created_at: i64,
}

/// A job without its two large descriptive fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub posted_by: UserId,
    pub created_at: i64,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.clone(),
            posted_by: job.posted_by.clone(),
            created_at: job.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_omits_large_fields() {
        let job = Job {
            id: JobId::new("j1"),
            title: "Intern".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            job_type: "internship".to_string(),
            description: "long text".to_string(),
            impression: "more long text".to_string(),
            posted_by: UserId::new("u1"),
            created_at: 5,
        };
        let value = serde_json::to_value(JobSummary::from(&job)).unwrap();
        assert!(value.get("description").is_none());
        assert!(value.get("impression").is_none());
        assert_eq!(value["jobType"], "internship");
    }
}
