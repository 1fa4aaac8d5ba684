//! API data models
//!
//! Request bodies, the response envelope and the sanitized user view.

mod account;
mod auth;
mod envelope;
mod jobs;
mod user_info;

pub use account::{ApplyJobRequest, QualificationInput, QualificationRequest, RegisterRequest, UpdateAccountRequest};
pub use auth::{ChangePasswordRequest, LoginRequest, LoginResponse, RefreshRequest, TokenResponse};
pub use envelope::{ApiResponse, ErrorBody};
pub use jobs::CreateJobRequest;
pub use user_info::UserInfo;
