//! portal-commons
//!
//! Shared domain models and type-safe identifiers used by every portal crate.
//! This crate has no knowledge of HTTP, storage engines or token formats.

pub mod models;
pub mod storage_key;

pub use models::{Job, JobId, JobSummary, Qualification, User, UserId, UserName};
pub use storage_key::StorageKey;
