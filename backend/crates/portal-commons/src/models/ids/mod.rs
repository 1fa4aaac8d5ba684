mod job_id;
mod user_id;
mod user_name;

pub use job_id::JobId;
pub use user_id::UserId;
pub use user_name::UserName;
