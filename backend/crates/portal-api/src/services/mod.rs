//! Business logic behind the HTTP handlers.
//!
//! Store calls are synchronous; services move them off the async workers
//! with [`run_blocking`].

mod account;
mod jobs;

pub use account::{AccountService, ImageSlot};
pub use jobs::JobService;

use crate::error::{ApiError, ApiResult};

pub(crate) async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ApiResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("Blocking task failed: {}", e)))?
}
