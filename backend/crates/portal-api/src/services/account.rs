//! Account Profile Service
//!
//! Registration and everything a signed-in user can do to their own record.
//! List appends (qualifications, applied jobs) and the duplicate check on
//! applications run inside `UserStore::update`, so they are atomic with
//! respect to concurrent requests for the same account.

use std::sync::Arc;

use chrono::NaiveDate;
use portal_auth::PasswordPolicy;
use portal_commons::{JobId, JobSummary, Qualification, User, UserId, UserName};
use portal_store::{EntityStore, JobStore, StorageError, UserStore};

use super::run_blocking;
use crate::error::{ApiError, ApiResult};
use crate::image_host::{ImageHost, UploadedImage};
use crate::models::{ApplyJobRequest, QualificationRequest, RegisterRequest, UpdateAccountRequest};
use crate::multipart::SpooledFile;

const USER_EXISTS: &str = "User with email or username already exists";
const USER_NOT_FOUND: &str = "User does not exist";
const JOB_ALREADY_APPLIED: &str = "Job already applied";

/// Which of the two profile pictures an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Profile,
    Cover,
}

impl ImageSlot {
    /// multipart field carrying the file
    pub fn field_name(self) -> &'static str {
        match self {
            ImageSlot::Profile => "profileImage",
            ImageSlot::Cover => "coverImage",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ImageSlot::Profile => "profile image",
            ImageSlot::Cover => "cover image",
        }
    }
}

/// Validated registration input.
struct NewAccount {
    fullname: String,
    email: String,
    username: UserName,
    password: String,
    mobile_number: String,
    birth_date: NaiveDate,
}

pub struct AccountService {
    users: Arc<UserStore>,
    jobs: Arc<JobStore>,
    images: Arc<dyn ImageHost>,
    policy: PasswordPolicy,
}

impl AccountService {
    pub fn new(
        users: Arc<UserStore>,
        jobs: Arc<JobStore>,
        images: Arc<dyn ImageHost>,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            users,
            jobs,
            images,
            policy,
        }
    }

    /// Create an account. The optional cover image is uploaded after the
    /// input has been validated; an upload failure leaves the cover empty.
    pub async fn register(
        &self,
        request: RegisterRequest,
        cover: Option<SpooledFile>,
    ) -> ApiResult<User> {
        let account = match self.check_registration(request).await {
            Ok(account) => account,
            Err(e) => {
                if let Some(file) = cover {
                    discard_file(&file).await;
                }
                return Err(e);
            },
        };

        let cover_image = match cover {
            Some(file) => match self.images.upload(&file.path).await {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("Cover image upload failed during registration: {}", e);
                    None
                },
            },
            None => None,
        };

        let result = self.create_account(account, cover_image.as_ref()).await;
        if let (Err(_), Some(image)) = (&result, &cover_image) {
            self.release_image(image).await;
        }
        result
    }

    async fn create_account(
        &self,
        account: NewAccount,
        cover_image: Option<&UploadedImage>,
    ) -> ApiResult<User> {
        let password_hash = self.policy.hash(&account.password).await?;
        let now = chrono::Utc::now().timestamp_millis();
        let user = User {
            id: UserId::generate(),
            username: account.username,
            email: account.email,
            fullname: account.fullname,
            password_hash,
            profile_image: String::new(),
            cover_image: cover_image.map(|image| image.url.clone()).unwrap_or_default(),
            birth_date: account.birth_date,
            mobile_number: account.mobile_number,
            qualifications: Vec::new(),
            my_applied: Vec::new(),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };

        let users = self.users.clone();
        let user_id = user.id.clone();
        let created = run_blocking(move || {
            match users.insert(&user) {
                Ok(()) => {},
                Err(StorageError::UniqueConstraintViolation(_)) => {
                    return Err(ApiError::Conflict(USER_EXISTS.to_string()))
                },
                Err(e) => return Err(e.into()),
            }
            users.get_by_id(&user.id).map_err(ApiError::from)
        })
        .await?;

        let created = created.ok_or_else(|| {
            ApiError::internal(format!("User {} missing right after registration", user_id))
        })?;
        log::info!("Registered user {} ({})", created.username, created.id);
        Ok(created)
    }

    async fn check_registration(&self, request: RegisterRequest) -> ApiResult<NewAccount> {
        let fields = [
            request.fullname,
            request.email,
            request.username,
            request.password,
            request.mobile_number,
            request.birth_date,
        ];
        if fields
            .iter()
            .any(|f| f.as_deref().map(str::trim).unwrap_or_default().is_empty())
        {
            return Err(ApiError::bad_request("All fields are required"));
        }
        let [fullname, email, username, password, mobile_number, birth_date] =
            fields.map(Option::unwrap_or_default);

        let birth_date = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d")
            .map_err(|_| ApiError::bad_request("birthDate must be formatted as YYYY-MM-DD"))?;
        self.policy.validate(&password)?;

        let account = NewAccount {
            fullname: fullname.trim().to_string(),
            email: User::normalize_email(&email),
            username: UserName::normalized(&username),
            password,
            mobile_number: mobile_number.trim().to_string(),
            birth_date,
        };

        let users = self.users.clone();
        let username = account.username.clone();
        let email = account.email.clone();
        let existing = run_blocking(move || {
            users
                .find_by_username_or_email(Some(username.as_str()), Some(&email))
                .map_err(ApiError::from)
        })
        .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(USER_EXISTS.to_string()));
        }

        Ok(account)
    }

    /// The caller's own record. A token whose account is gone is treated as
    /// unauthenticated.
    pub async fn current_user(&self, user_id: &UserId) -> ApiResult<User> {
        let users = self.users.clone();
        let id = user_id.clone();
        run_blocking(move || users.get_by_id(&id).map_err(ApiError::from))
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid access token".to_string()))
    }

    pub async fn update_account(
        &self,
        user_id: &UserId,
        request: UpdateAccountRequest,
    ) -> ApiResult<User> {
        let fullname = request.fullname.map(|f| f.trim().to_string()).unwrap_or_default();
        let email = request.email.map(|e| User::normalize_email(&e)).unwrap_or_default();
        if fullname.is_empty() || email.is_empty() {
            return Err(ApiError::bad_request("All fields are required"));
        }

        let result = self
            .update_user(user_id, move |user| {
                user.fullname = fullname;
                user.email = email;
                Ok(())
            })
            .await;

        match result {
            Err(ApiError::Conflict(_)) => {
                Err(ApiError::Conflict("Email is already in use".to_string()))
            },
            other => other,
        }
    }

    /// Replace the profile or cover picture with the uploaded file.
    pub async fn update_image(
        &self,
        user_id: &UserId,
        slot: ImageSlot,
        file: Option<SpooledFile>,
    ) -> ApiResult<User> {
        let file = file.ok_or_else(|| {
            ApiError::bad_request(format!("{} file is missing", capitalize(slot.label())))
        })?;

        let image = self.images.upload(&file.path).await.map_err(|e| {
            log::warn!("Upload of {} for {} failed: {}", slot.label(), user_id, e);
            ApiError::bad_request(format!("Error while uploading {}", slot.label()))
        })?;

        let url = image.url.clone();
        let result = self
            .update_user(user_id, move |user| {
                match slot {
                    ImageSlot::Profile => user.profile_image = url,
                    ImageSlot::Cover => user.cover_image = url,
                }
                Ok(())
            })
            .await;
        if result.is_err() {
            self.release_image(&image).await;
        }
        result
    }

    /// Removes an image that was published but never recorded on a user.
    async fn release_image(&self, image: &UploadedImage) {
        if let Err(e) = self.images.remove(image).await {
            log::warn!("Could not remove orphaned image {}: {}", image.url, e);
        }
    }

    pub async fn update_profile_image(
        &self,
        user_id: &UserId,
        file: Option<SpooledFile>,
    ) -> ApiResult<User> {
        self.update_image(user_id, ImageSlot::Profile, file).await
    }

    pub async fn update_cover_image(
        &self,
        user_id: &UserId,
        file: Option<SpooledFile>,
    ) -> ApiResult<User> {
        self.update_image(user_id, ImageSlot::Cover, file).await
    }

    pub async fn add_qualification(
        &self,
        user_id: &UserId,
        request: QualificationRequest,
    ) -> ApiResult<User> {
        let input = request.qualification.unwrap_or_default();
        let degree = input.degree.map(|d| d.trim().to_string()).unwrap_or_default();
        let (Some(start_year), Some(end_year)) = (input.start_year, input.end_year) else {
            return Err(ApiError::bad_request("All fields are required for qualification"));
        };
        if degree.is_empty() {
            return Err(ApiError::bad_request("All fields are required for qualification"));
        }

        let qualification = Qualification::new(degree, start_year, end_year);
        self.update_user(user_id, move |user| {
            user.qualifications.push(qualification);
            Ok(())
        })
        .await
    }

    /// Summaries of the jobs the caller applied to, in application order.
    /// Jobs deleted since are left out.
    pub async fn applied_jobs(&self, user_id: &UserId) -> ApiResult<Vec<JobSummary>> {
        let users = self.users.clone();
        let jobs = self.jobs.clone();
        let id = user_id.clone();
        run_blocking(move || {
            let user = users
                .get_by_id(&id)?
                .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
            let applied = jobs.get_many(&user.my_applied)?;
            Ok(applied.iter().map(JobSummary::from).collect())
        })
        .await
    }

    pub async fn apply_to_job(&self, user_id: &UserId, request: ApplyJobRequest) -> ApiResult<User> {
        let job_id = request
            .job_id
            .map(|j| j.trim().to_string())
            .filter(|j| !j.is_empty())
            .map(JobId::new)
            .ok_or_else(|| ApiError::bad_request("Job ID is required"))?;

        let jobs = self.jobs.clone();
        let lookup = job_id.clone();
        if run_blocking(move || jobs.get(&lookup).map_err(ApiError::from))
            .await?
            .is_none()
        {
            return Err(ApiError::not_found("Job not found"));
        }

        let result = self
            .update_user(user_id, move |user| {
                if user.has_applied(&job_id) {
                    return Err(StorageError::ConditionFailed(JOB_ALREADY_APPLIED.to_string()));
                }
                user.my_applied.push(job_id);
                Ok(())
            })
            .await;

        if result.is_ok() {
            log::debug!("User {} applied to a job", user_id);
        }
        result
    }

    /// Atomic read-modify-write of the caller's record.
    ///
    /// A `ConditionFailed` raised by `mutate` becomes `BadRequest` with its
    /// message; an absent user becomes `NotFound`.
    async fn update_user<F>(&self, user_id: &UserId, mutate: F) -> ApiResult<User>
    where
        F: FnOnce(&mut User) -> portal_store::Result<()> + Send + 'static,
    {
        let users = self.users.clone();
        let id = user_id.clone();
        run_blocking(move || match users.update(&id, mutate) {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ApiError::not_found(USER_NOT_FOUND)),
            Err(StorageError::ConditionFailed(message)) => Err(ApiError::BadRequest(message)),
            Err(e) => Err(e.into()),
        })
        .await
    }
}

async fn discard_file(file: &SpooledFile) {
    if let Err(e) = tokio::fs::remove_file(&file.path).await {
        log::debug!("Could not remove upload {}: {}", file.path.display(), e);
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QualificationInput;
    use crate::test_utils::{job_store, register_request, seed_job, user_store, FailingImageHost};
    use crate::LocalImageHost;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        users: Arc<UserStore>,
        jobs: Arc<JobStore>,
        service: AccountService,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let users = user_store();
        let jobs = job_store();
        let images = Arc::new(LocalImageHost::new(dir.path().join("media"), "http://img.test"));
        let service = AccountService::new(
            users.clone(),
            jobs.clone(),
            images,
            PasswordPolicy {
                min_length: 1,
                max_length: 72,
                bcrypt_cost: 4,
            },
        );
        Fixture {
            _dir: dir,
            users,
            jobs,
            service,
        }
    }

    async fn spooled(dir: &TempDir, name: &str) -> SpooledFile {
        let path = dir.path().join(name);
        tokio::fs::write(&path, b"image").await.unwrap();
        SpooledFile {
            path,
            original_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_only_a_hash() {
        let f = fixture();
        let user = f.service.register(register_request("Alice", "A@X.com"), None).await.unwrap();

        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(user.email, "a@x.com");
        assert!(user.password_hash.starts_with("$2"));
        assert_ne!(user.password_hash, "secret1");
        assert!(user.refresh_token.is_none());
        assert!(f.users.get_by_username("alice").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let f = fixture();
        let mut request = register_request("alice", "a@x.com");
        request.mobile_number = Some("   ".to_string());

        let err = f.service.register(request, None).await.unwrap_err();
        assert_eq!(err, ApiError::BadRequest("All fields are required".into()));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_birth_date() {
        let f = fixture();
        let mut request = register_request("alice", "a@x.com");
        request.birth_date = Some("02/01/2000".to_string());
        assert!(matches!(
            f.service.register(request, None).await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let f = fixture();
        f.service.register(register_request("alice", "a@x.com"), None).await.unwrap();

        let err = f
            .service
            .register(register_request("ALICE", "other@x.com"), None)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Conflict(USER_EXISTS.into()));

        let err = f
            .service
            .register(register_request("bob", "a@x.com"), None)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Conflict(USER_EXISTS.into()));
    }

    #[tokio::test]
    async fn test_register_uploads_cover_image() {
        let f = fixture();
        let dir = TempDir::new().unwrap();
        let cover = spooled(&dir, "cover.png").await;
        let temp_path = cover.path.clone();

        let user = f
            .service
            .register(register_request("alice", "a@x.com"), Some(cover))
            .await
            .unwrap();
        assert!(user.cover_image.starts_with("http://img.test/"));
        assert!(!temp_path.exists());
    }

    #[tokio::test]
    async fn test_register_survives_cover_upload_failure() {
        let dir = TempDir::new().unwrap();
        let service = AccountService::new(
            user_store(),
            job_store(),
            Arc::new(FailingImageHost),
            PasswordPolicy {
                min_length: 1,
                max_length: 72,
                bcrypt_cost: 4,
            },
        );
        let cover = spooled(&dir, "cover.png").await;

        let user = service
            .register(register_request("alice", "a@x.com"), Some(cover))
            .await
            .unwrap();
        assert_eq!(user.cover_image, "");
    }

    #[tokio::test]
    async fn test_current_user_for_deleted_account() {
        let f = fixture();
        let err = f.service.current_user(&UserId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_update_account() {
        let f = fixture();
        let alice = f.service.register(register_request("alice", "a@x.com"), None).await.unwrap();
        f.service.register(register_request("bob", "b@x.com"), None).await.unwrap();

        let updated = f
            .service
            .update_account(
                &alice.id,
                UpdateAccountRequest {
                    fullname: Some("Alice Liddell".into()),
                    email: Some("Alice@Wonder.land".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.fullname, "Alice Liddell");
        assert_eq!(updated.email, "alice@wonder.land");
        assert_eq!(updated.mobile_number, alice.mobile_number);

        let err = f
            .service
            .update_account(
                &alice.id,
                UpdateAccountRequest {
                    fullname: Some("Alice".into()),
                    email: Some("b@x.com".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err = f
            .service
            .update_account(
                &alice.id,
                UpdateAccountRequest {
                    fullname: Some("Alice".into()),
                    email: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_images() {
        let f = fixture();
        let dir = TempDir::new().unwrap();
        let alice = f.service.register(register_request("alice", "a@x.com"), None).await.unwrap();

        let err = f.service.update_profile_image(&alice.id, None).await.unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Profile image file is missing".into()));

        let file = spooled(&dir, "me.jpg").await;
        let updated = f.service.update_profile_image(&alice.id, Some(file)).await.unwrap();
        assert!(updated.profile_image.starts_with("http://img.test/"));
        assert_eq!(updated.cover_image, "");

        let file = spooled(&dir, "wide.jpg").await;
        let updated = f.service.update_cover_image(&alice.id, Some(file)).await.unwrap();
        assert!(updated.cover_image.starts_with("http://img.test/"));
    }

    #[tokio::test]
    async fn test_failed_image_upload_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let users = user_store();
        let service = AccountService::new(
            users,
            job_store(),
            Arc::new(FailingImageHost),
            PasswordPolicy {
                min_length: 1,
                max_length: 72,
                bcrypt_cost: 4,
            },
        );
        let alice = service.register(register_request("alice", "a@x.com"), None).await.unwrap();
        let file = spooled(&dir, "me.jpg").await;

        let err = service.update_cover_image(&alice.id, Some(file)).await.unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Error while uploading cover image".into()));
    }

    #[tokio::test]
    async fn test_image_for_missing_user_is_taken_down() {
        let f = fixture();
        let dir = TempDir::new().unwrap();
        let file = spooled(&dir, "me.jpg").await;
        let temp_path = file.path.clone();

        let err = f
            .service
            .update_profile_image(&UserId::new("ghost"), Some(file))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound(USER_NOT_FOUND.into()));
        assert!(!temp_path.exists());

        let media_dir = f._dir.path().join("media");
        assert_eq!(std::fs::read_dir(media_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_add_qualification() {
        let f = fixture();
        let alice = f.service.register(register_request("alice", "a@x.com"), None).await.unwrap();

        let updated = f
            .service
            .add_qualification(
                &alice.id,
                QualificationRequest {
                    qualification: Some(QualificationInput {
                        degree: Some("BSc".into()),
                        start_year: Some(2018),
                        end_year: Some(2022),
                    }),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.qualifications, vec![Qualification::new("BSc", 2018, 2022)]);

        let err = f
            .service
            .add_qualification(
                &alice.id,
                QualificationRequest {
                    qualification: Some(QualificationInput {
                        degree: Some("MSc".into()),
                        start_year: Some(2022),
                        end_year: None,
                    }),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let stored = f.users.get_by_id(&alice.id).unwrap().unwrap();
        assert_eq!(stored.qualifications.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_to_job_once() {
        let f = fixture();
        let alice = f.service.register(register_request("alice", "a@x.com"), None).await.unwrap();
        let job = seed_job(&f.jobs, "Intern");
        let request = || ApplyJobRequest {
            job_id: Some(job.id.to_string()),
        };

        let updated = f.service.apply_to_job(&alice.id, request()).await.unwrap();
        assert_eq!(updated.my_applied, vec![job.id.clone()]);

        let err = f.service.apply_to_job(&alice.id, request()).await.unwrap_err();
        assert_eq!(err, ApiError::BadRequest(JOB_ALREADY_APPLIED.into()));

        let stored = f.users.get_by_id(&alice.id).unwrap().unwrap();
        assert_eq!(stored.my_applied.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_to_job_validation() {
        let f = fixture();
        let alice = f.service.register(register_request("alice", "a@x.com"), None).await.unwrap();

        let err = f
            .service
            .apply_to_job(&alice.id, ApplyJobRequest { job_id: Some(" ".into()) })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Job ID is required".into()));

        let err = f
            .service
            .apply_to_job(
                &alice.id,
                ApplyJobRequest {
                    job_id: Some("missing".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_applied_jobs_skip_deleted_postings() {
        let f = fixture();
        let alice = f.service.register(register_request("alice", "a@x.com"), None).await.unwrap();
        let first = seed_job(&f.jobs, "First");
        let second = seed_job(&f.jobs, "Second");

        for job in [&first, &second] {
            f.service
                .apply_to_job(
                    &alice.id,
                    ApplyJobRequest {
                        job_id: Some(job.id.to_string()),
                    },
                )
                .await
                .unwrap();
        }
        f.jobs.delete(&first.id).unwrap();

        let applied = f.service.applied_jobs(&alice.id).await.unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].title, "Second");

        let err = f.service.applied_jobs(&UserId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
