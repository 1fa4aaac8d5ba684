// Default value functions

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8000
}

pub fn default_workers() -> usize {
    0
}

pub fn default_true() -> bool {
    true
}

pub fn default_storage_backend() -> String {
    "rocksdb".to_string()
}

pub fn default_data_path() -> String {
    "./data".to_string() // Default dev path; normalized to absolute at runtime
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

/// Development-only secret. `validate()` accepts it, but the server logs a
/// warning at startup while it is in use.
pub fn default_access_token_secret() -> String {
    "portal-dev-access-secret-change-in-production".to_string()
}

pub fn default_refresh_token_secret() -> String {
    "portal-dev-refresh-secret-change-in-production".to_string()
}

pub fn default_access_token_expiry_minutes() -> i64 {
    60 * 24 // 1 day
}

/// Upper bound accepted by `validate()` (one year)
pub const MAX_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60 * 24 * 365;

/// Upper bound accepted by `validate()` (ten years)
pub const MAX_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 365 * 10;

pub fn default_refresh_token_expiry_days() -> i64 {
    10
}

pub fn default_bcrypt_cost() -> u32 {
    10
}

pub fn default_min_password_length() -> usize {
    1
}

pub fn default_max_password_length() -> usize {
    72 // bcrypt only uses the first 72 bytes
}

pub fn default_upload_temp_dir() -> String {
    "./public/temp".to_string()
}

pub fn default_media_dir() -> String {
    "./public/media".to_string()
}

pub fn default_public_base_url() -> String {
    "http://127.0.0.1:8000/media".to_string()
}

pub fn default_max_file_size() -> usize {
    5 * 1024 * 1024 // 5MB
}

pub fn default_max_form_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

pub fn default_max_form_parts() -> usize {
    16
}

pub fn default_max_json_payload() -> usize {
    256 * 1024
}

pub fn default_cors_methods() -> Vec<String> {
    ["GET", "POST", "PATCH", "PUT", "DELETE", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

pub fn default_cors_headers() -> Vec<String> {
    ["Authorization", "Content-Type", "Accept", "Origin"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

pub fn default_cors_max_age() -> usize {
    3600
}
