//! User info model

use portal_commons::{JobId, Qualification, User, UserId, UserName};
use serde::Serialize;

/// Outward view of a user. Never carries the password hash or refresh token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: UserId,
    pub username: UserName,
    pub email: String,
    pub fullname: String,
    pub profile_image: String,
    pub cover_image: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub mobile_number: String,
    pub qualifications: Vec<Qualification>,
    pub my_applied: Vec<JobId>,
    /// RFC3339
    pub created_at: String,
    /// RFC3339
    pub updated_at: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            fullname: user.fullname.clone(),
            profile_image: user.profile_image.clone(),
            cover_image: user.cover_image.clone(),
            birth_date: user.birth_date.format("%Y-%m-%d").to_string(),
            mobile_number: user.mobile_number.clone(),
            qualifications: user.qualifications.clone(),
            my_applied: user.my_applied.clone(),
            created_at: millis_to_rfc3339(user.created_at),
            updated_at: millis_to_rfc3339(user.updated_at),
        }
    }
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

fn millis_to_rfc3339(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_else(chrono::Utc::now)
        .to_rfc3339()
}
