//! Partition names. Each maps to one RocksDB column family.

/// User documents keyed by `UserId`
pub const USERS: &str = "users";
/// Unique index: normalized username → `UserId`
pub const USERS_BY_USERNAME: &str = "users_username_idx";
/// Unique index: normalized email → `UserId`
pub const USERS_BY_EMAIL: &str = "users_email_idx";
/// Job documents keyed by `JobId`
pub const JOBS: &str = "jobs";

/// Every partition the portal needs, created at open time.
pub const ALL: [&str; 4] = [USERS, USERS_BY_USERNAME, USERS_BY_EMAIL, JOBS];
