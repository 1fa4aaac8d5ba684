//! Job postings store.

use crate::entity_store::EntityStore;
use crate::partitions;
use crate::storage_trait::{Result, StorageBackend};
use portal_commons::{Job, JobId};
use std::sync::Arc;

pub struct JobStore {
    backend: Arc<dyn StorageBackend>,
}

impl EntityStore<JobId, Job> for JobStore {
    fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    fn partition(&self) -> &str {
        partitions::JOBS
    }
}

impl JobStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn insert(&self, job: &Job) -> Result<()> {
        self.put(&job.id, job)?;
        log::debug!("Inserted job {} '{}'", job.id, job.title);
        Ok(())
    }

    /// All jobs, newest first.
    pub fn list(&self) -> Result<Vec<Job>> {
        let mut jobs: Vec<Job> = self.scan_all()?.into_iter().map(|(_, job)| job).collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    /// Resolves `ids` in order, skipping ids with no stored job.
    pub fn get_many(&self, ids: &[JobId]) -> Result<Vec<Job>> {
        let mut jobs = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(id)? {
                Some(job) => jobs.push(job),
                None => log::debug!("Skipping missing job {}", id),
            }
        }
        Ok(jobs)
    }
}
