//! Account handlers
//!
//! Every endpoint here sits behind the request gate and works on the
//! caller's own record.

mod applied_jobs;
mod images;
mod profile;

pub use applied_jobs::{applied_jobs_handler, apply_job_handler};
pub use images::{update_cover_image_handler, update_profile_image_handler};
pub use profile::{add_qualification_handler, current_user_handler, update_account_handler};
