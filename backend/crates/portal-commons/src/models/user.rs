//! Identity record as persisted in the `users` partition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{JobId, Qualification, UserId, UserName};

/// A registered account.
///
/// This is the storage representation and carries the credential hash and
/// the live refresh token. It must never be serialized into an HTTP
/// response; the API layer converts it into a sanitized view first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique, lower-cased handle.
    pub username: UserName,
    /// Unique, lower-cased contact address.
    pub email: String,
    pub fullname: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub cover_image: String,
    pub birth_date: NaiveDate,
    pub mobile_number: String,
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
    /// Jobs this user applied to, in application order, without duplicates.
    #[serde(default)]
    pub my_applied: Vec<JobId>,
    /// The single live refresh token (single session per account).
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
}

impl User {
    /// Normalizes an email address the same way it is indexed.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Whether the user already applied to `job_id`.
    pub fn has_applied(&self, job_id: &JobId) -> bool {
        self.my_applied.iter().any(|j| j == job_id)
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }
}
