use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level server configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default, alias = "authentication")]
    pub auth: AuthSettings,
    #[serde(default)]
    pub uploads: UploadSettings,
    #[serde(default)]
    pub security: SecuritySettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Worker threads; 0 = one per CPU core
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Maximum accepted JSON body size in bytes
    #[serde(default = "default_max_json_payload")]
    pub max_json_payload: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            max_json_payload: default_max_json_payload(),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// "rocksdb" (persistent) or "memory" (lost on restart)
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Base data directory. RocksDB lives in `{data_path}/rocksdb`.
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_path: default_data_path(),
        }
    }
}

impl StorageSettings {
    pub fn rocksdb_dir(&self) -> String {
        format!("{}/rocksdb", self.data_path.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files (default: "./logs")
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides
    /// [logging.targets]
    /// portal_store = "debug"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: true,
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

/// Token and password settings.
///
/// Secrets are read once at startup and handed to the token codec as
/// immutable values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret for access tokens
    #[serde(default = "default_access_token_secret")]
    pub access_token_secret: String,

    /// Access token lifetime in minutes (default: 1 day)
    #[serde(default = "default_access_token_expiry_minutes")]
    pub access_token_expiry_minutes: i64,

    /// HS256 secret for refresh tokens, must differ from the access secret
    #[serde(default = "default_refresh_token_secret")]
    pub refresh_token_secret: String,

    /// Refresh token lifetime in days (default: 10)
    #[serde(default = "default_refresh_token_expiry_days")]
    pub refresh_token_expiry_days: i64,

    /// Whether auth cookies carry the Secure flag (default: true)
    #[serde(default = "default_true")]
    pub cookie_secure: bool,

    /// Bcrypt cost factor (range: 4-31)
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    #[serde(default = "default_max_password_length")]
    pub max_password_length: usize,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            access_token_secret: default_access_token_secret(),
            access_token_expiry_minutes: default_access_token_expiry_minutes(),
            refresh_token_secret: default_refresh_token_secret(),
            refresh_token_expiry_days: default_refresh_token_expiry_days(),
            cookie_secure: true,
            bcrypt_cost: default_bcrypt_cost(),
            min_password_length: default_min_password_length(),
            max_password_length: default_max_password_length(),
        }
    }
}

impl AuthSettings {
    /// True while either secret is still the built-in development value.
    pub fn uses_default_secrets(&self) -> bool {
        self.access_token_secret == default_access_token_secret()
            || self.refresh_token_secret == default_refresh_token_secret()
    }
}

/// File upload and image hosting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Where multipart uploads are spooled before being handed to the image host
    #[serde(default = "default_upload_temp_dir")]
    pub temp_dir: String,
    /// Where the local image host keeps published images
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
    /// Public URL prefix under which `media_dir` is served
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Maximum size of a single uploaded file in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
    /// Maximum size of a whole multipart body (all parts together) in bytes
    #[serde(default = "default_max_form_size")]
    pub max_form_size: usize,
    /// Maximum number of parts in one multipart body
    #[serde(default = "default_max_form_parts")]
    pub max_form_parts: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            temp_dir: default_upload_temp_dir(),
            media_dir: default_media_dir(),
            public_base_url: default_public_base_url(),
            max_file_size: default_max_file_size(),
            max_form_size: default_max_form_size(),
            max_form_parts: default_max_form_parts(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(default)]
    pub cors: CorsSettings,
}

/// CORS configuration that maps directly to actix-cors options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. Empty or ["*"] = any origin.
    /// Credentials cannot be combined with a wildcard origin, so production
    /// deployments should list the frontend origin explicitly.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,

    #[serde(default = "default_cors_headers")]
    pub allowed_headers: Vec<String>,

    /// Allow credentials (cookies). Default: true
    #[serde(default = "default_true")]
    pub allow_credentials: bool,

    /// Preflight cache max age in seconds
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            allow_credentials: true,
            max_age: default_cors_max_age(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            logging: LoggingSettings::default(),
            auth: AuthSettings::default(),
            uploads: UploadSettings::default(),
            security: SecuritySettings::default(),
        }
    }
}
