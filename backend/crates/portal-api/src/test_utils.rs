//! Fixtures shared by this crate's tests.

use std::path::Path;
use std::sync::Arc;

use actix_web::web;
use chrono::{Duration, NaiveDate};
use portal_auth::{CookieConfig, PasswordPolicy, SessionManager, TokenCodec};
use portal_commons::{Job, JobId, User, UserId, UserName};
use portal_configs::UploadSettings;
use portal_store::{partitions, InMemoryBackend, JobStore, StorageBackend, UserStore};
use tempfile::TempDir;

use crate::image_host::{ImageHost, ImageHostError, LocalImageHost, UploadedImage};
use crate::models::RegisterRequest;
use crate::repositories::StoreUserRepo;
use crate::services::{AccountService, JobService};
use crate::state::AppState;

pub const MULTIPART_BOUNDARY: &str = "portal-test-boundary";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data; boundary=portal-test-boundary";

pub fn backend() -> Arc<dyn StorageBackend> {
    Arc::new(InMemoryBackend::with_partitions(&partitions::ALL))
}

pub fn user_store() -> Arc<UserStore> {
    Arc::new(UserStore::new(backend()))
}

pub fn job_store() -> Arc<JobStore> {
    Arc::new(JobStore::new(backend()))
}

pub fn test_policy() -> PasswordPolicy {
    PasswordPolicy {
        min_length: 1,
        max_length: 72,
        bcrypt_cost: 4,
    }
}

pub fn sample_user(username: &str, email: &str) -> User {
    User {
        id: UserId::generate(),
        username: UserName::normalized(username),
        email: User::normalize_email(email),
        fullname: "Sample User".to_string(),
        password_hash: String::new(),
        profile_image: String::new(),
        cover_image: String::new(),
        birth_date: NaiveDate::from_ymd_opt(2000, 1, 2).unwrap(),
        mobile_number: "5550100".to_string(),
        qualifications: vec![],
        my_applied: vec![],
        refresh_token: None,
        created_at: 0,
        updated_at: 0,
    }
}

/// A complete registration with password `secret1`.
pub fn register_request(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        fullname: Some("Alice Example".to_string()),
        email: Some(email.to_string()),
        username: Some(username.to_string()),
        password: Some("secret1".to_string()),
        mobile_number: Some("5550100".to_string()),
        birth_date: Some("2000-01-02".to_string()),
    }
}

pub fn seed_job(jobs: &JobStore, title: &str) -> Job {
    let job = Job {
        id: JobId::generate(),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        job_type: "internship".to_string(),
        description: String::new(),
        impression: String::new(),
        posted_by: UserId::new("poster"),
        created_at: chrono::Utc::now().timestamp_millis(),
    };
    jobs.insert(&job).unwrap();
    job
}

/// Image host that rejects every upload.
pub struct FailingImageHost;

#[async_trait::async_trait]
impl ImageHost for FailingImageHost {
    async fn upload(&self, local_path: &Path) -> Result<UploadedImage, ImageHostError> {
        Err(ImageHostError::MissingFile(local_path.display().to_string()))
    }

    async fn remove(&self, image: &UploadedImage) -> Result<(), ImageHostError> {
        Err(ImageHostError::MissingFile(image.url.clone()))
    }
}

/// Fully wired state over an in-memory store; uploads live under `dir`.
pub fn test_state(dir: &TempDir) -> AppState {
    let backend = backend();
    let users = Arc::new(UserStore::new(backend.clone()));
    let jobs = Arc::new(JobStore::new(backend));

    let codec = TokenCodec::new(
        "test-access-secret",
        Duration::minutes(15),
        "test-refresh-secret",
        Duration::days(1),
    );
    let session = SessionManager::new(Arc::new(StoreUserRepo::new(users.clone())), codec, test_policy());
    let images = Arc::new(LocalImageHost::new(dir.path().join("media"), "http://img.test"));

    AppState {
        session: web::Data::new(session),
        accounts: web::Data::new(AccountService::new(users, jobs.clone(), images, test_policy())),
        jobs: web::Data::new(JobService::new(jobs)),
        cookies: web::Data::new(CookieConfig::with_secure(false)),
        uploads: web::Data::new(UploadSettings {
            temp_dir: dir.path().join("temp").display().to_string(),
            media_dir: dir.path().join("media").display().to_string(),
            public_base_url: "http://img.test".to_string(),
            max_file_size: 1024 * 1024,
            max_form_size: 4 * 1024 * 1024,
            max_form_parts: 16,
        }),
        max_json_payload: 1024 * 1024,
    }
}

pub enum MultipartPart<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
}

impl<'a> MultipartPart<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        MultipartPart::Text { name, value }
    }

    pub fn file(name: &'a str, filename: &'a str, data: &'a [u8]) -> Self {
        MultipartPart::File {
            name,
            filename,
            data,
        }
    }
}

/// Encodes `parts` as a multipart/form-data body using [`MULTIPART_BOUNDARY`].
pub fn multipart_body(parts: &[MultipartPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        match part {
            MultipartPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            },
            MultipartPart::File {
                name,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            },
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}
