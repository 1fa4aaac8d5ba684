//! Domain models shared across the portal backend.

pub mod ids;
mod job;
mod qualification;
mod user;

pub use ids::{JobId, UserId, UserName};
pub use job::{Job, JobSummary};
pub use qualification::Qualification;
pub use user::User;
