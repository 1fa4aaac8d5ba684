use super::defaults::{MAX_ACCESS_TOKEN_EXPIRY_MINUTES, MAX_REFRESH_TOKEN_EXPIRY_DAYS};
use super::types::ServerConfig;
use std::fs;
use std::path::{Path, PathBuf};

const VALID_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl ServerConfig {
    /// Load configuration from a TOML file, apply environment overrides and
    /// validate the result.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.apply_env_overrides()?;
        config.finalize()?;

        Ok(config)
    }

    /// Load `path` when it exists, otherwise start from defaults.
    ///
    /// Environment overrides and validation apply in both cases.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            return Self::from_file(path);
        }

        log::warn!(
            "Config file {} not found, using built-in defaults",
            path.as_ref().display()
        );
        let mut config = ServerConfig::default();
        config.apply_env_overrides()?;
        config.finalize()?;
        Ok(config)
    }

    /// Apply `PORTAL_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PORTAL_SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(port_str) = lookup("PORTAL_SERVER_PORT") {
            self.server.port = port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid PORTAL_SERVER_PORT value: {}", port_str))?;
        }

        if let Some(path) = lookup("PORTAL_DATA_PATH") {
            self.storage.data_path = path;
        }

        if let Some(level) = lookup("PORTAL_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        // Secrets: never echo their values in errors or logs
        if let Some(secret) = lookup("PORTAL_ACCESS_TOKEN_SECRET") {
            self.auth.access_token_secret = secret;
        }

        if let Some(secret) = lookup("PORTAL_REFRESH_TOKEN_SECRET") {
            self.auth.refresh_token_secret = secret;
        }

        if let Some(flag) = lookup("PORTAL_COOKIE_SECURE") {
            self.auth.cookie_secure = match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(anyhow::anyhow!(
                        "Invalid PORTAL_COOKIE_SECURE value: {}",
                        flag
                    ))
                },
            };
        }

        Ok(())
    }

    /// Normalize directory-like paths so relative paths resolve against the
    /// working directory once, at startup.
    fn normalize_paths(&mut self) {
        self.storage.data_path = normalize_dir_path(&self.storage.data_path);
        self.logging.logs_path = normalize_dir_path(&self.logging.logs_path);
        self.uploads.temp_dir = normalize_dir_path(&self.uploads.temp_dir);
        self.uploads.media_dir = normalize_dir_path(&self.uploads.media_dir);
    }

    /// Normalize local filesystem paths and validate configuration.
    pub fn finalize(&mut self) -> anyhow::Result<()> {
        self.normalize_paths();
        self.validate()?;
        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            ));
        }

        let valid_formats = ["compact", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    VALID_LEVELS.join(", ")
                ));
            }
        }

        let valid_backends = ["rocksdb", "memory"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid storage backend '{}'. Must be one of: {}",
                self.storage.backend,
                valid_backends.join(", ")
            ));
        }

        let auth = &self.auth;
        if auth.access_token_secret.trim().is_empty() || auth.refresh_token_secret.trim().is_empty()
        {
            return Err(anyhow::anyhow!("Token secrets cannot be empty"));
        }

        if auth.access_token_secret == auth.refresh_token_secret {
            return Err(anyhow::anyhow!(
                "access_token_secret and refresh_token_secret must differ"
            ));
        }

        if auth.access_token_expiry_minutes <= 0 || auth.refresh_token_expiry_days <= 0 {
            return Err(anyhow::anyhow!("Token expiry values must be positive"));
        }

        if auth.access_token_expiry_minutes > MAX_ACCESS_TOKEN_EXPIRY_MINUTES {
            return Err(anyhow::anyhow!(
                "access_token_expiry_minutes cannot exceed {}, got {}",
                MAX_ACCESS_TOKEN_EXPIRY_MINUTES,
                auth.access_token_expiry_minutes
            ));
        }

        if auth.refresh_token_expiry_days > MAX_REFRESH_TOKEN_EXPIRY_DAYS {
            return Err(anyhow::anyhow!(
                "refresh_token_expiry_days cannot exceed {}, got {}",
                MAX_REFRESH_TOKEN_EXPIRY_DAYS,
                auth.refresh_token_expiry_days
            ));
        }

        if !(4..=31).contains(&auth.bcrypt_cost) {
            return Err(anyhow::anyhow!(
                "bcrypt_cost must be between 4 and 31, got {}",
                auth.bcrypt_cost
            ));
        }

        if auth.min_password_length == 0 || auth.min_password_length > auth.max_password_length {
            return Err(anyhow::anyhow!(
                "min_password_length ({}) must be at least 1 and not exceed max_password_length ({})",
                auth.min_password_length,
                auth.max_password_length
            ));
        }

        if self.uploads.max_file_size == 0 {
            return Err(anyhow::anyhow!("uploads.max_file_size cannot be 0"));
        }

        if self.uploads.max_form_size < self.uploads.max_file_size {
            return Err(anyhow::anyhow!(
                "uploads.max_form_size ({}) must be at least uploads.max_file_size ({})",
                self.uploads.max_form_size,
                self.uploads.max_file_size
            ));
        }

        if self.uploads.max_form_parts == 0 {
            return Err(anyhow::anyhow!("uploads.max_form_parts cannot be 0"));
        }

        Ok(())
    }
}

/// Turn a relative directory into an absolute one (based on the current
/// working directory). Absolute paths are returned unchanged.
fn normalize_dir_path(raw: &str) -> String {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return raw.to_string();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd
            .join(path.strip_prefix("./").unwrap_or(&path))
            .to_string_lossy()
            .into_owned(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ServerConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let mut config = ServerConfig::default();
        config.auth.refresh_token_secret = config.auth.access_token_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bcrypt_cost_range() {
        let mut config = ServerConfig::default();
        config.auth.bcrypt_cost = 3;
        assert!(config.validate().is_err());
        config.auth.bcrypt_cost = 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_expiry_upper_bounds() {
        let mut config = ServerConfig::default();
        config.auth.access_token_expiry_minutes = i64::MAX;
        assert!(config.validate().is_err());
        config.auth.access_token_expiry_minutes = MAX_ACCESS_TOKEN_EXPIRY_MINUTES;
        assert!(config.validate().is_ok());

        config.auth.refresh_token_expiry_days = MAX_REFRESH_TOKEN_EXPIRY_DAYS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multipart_limits() {
        let mut config = ServerConfig::default();
        config.uploads.max_form_size = config.uploads.max_file_size - 1;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.uploads.max_form_parts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORTAL_SERVER_PORT", "9090"),
            ("PORTAL_ACCESS_TOKEN_SECRET", "a-secret"),
            ("PORTAL_COOKIE_SECURE", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config
            .apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.auth.access_token_secret, "a-secret");
        assert!(!config.auth.cookie_secure);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = ServerConfig::default();
        let result = config.apply_overrides_from(|k| {
            (k == "PORTAL_SERVER_PORT").then(|| "not-a-port".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 8123\n\n[auth]\naccess_token_expiry_minutes = 15\n"
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.auth.access_token_expiry_minutes, 15);
        assert_eq!(config.auth.refresh_token_expiry_days, 10);
        assert!(Path::new(&config.storage.data_path).is_absolute());
    }
}
