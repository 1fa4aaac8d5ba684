//! Server lifecycle management helpers.
//!
//! `bootstrap` opens storage and builds every service; `run` wires the HTTP
//! server around them. Shutdown is actix-web's default signal handling.

use crate::middleware;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use log::{debug, info, warn};
use portal_api::{AccountService, AppState, JobService, LocalImageHost, StoreUserRepo};
use portal_auth::{CookieConfig, PasswordPolicy, SessionManager, TokenCodec};
use portal_configs::ServerConfig;
use portal_store::{
    partitions, InMemoryBackend, JobStore, RocksDBBackend, RocksDbInit, StorageBackend, UserStore,
};
use std::sync::Arc;
use std::time::Instant;

/// Aggregated application components shared by the HTTP workers.
pub struct ApplicationComponents {
    pub backend: Arc<dyn StorageBackend>,
    pub users: Arc<UserStore>,
    pub jobs: Arc<JobStore>,
    pub state: AppState,
}

/// Open the configured storage backend.
pub fn open_backend(config: &ServerConfig) -> Result<Arc<dyn StorageBackend>> {
    match config.storage.backend.as_str() {
        "memory" => {
            warn!("Using the in-memory storage backend; data is lost on restart");
            Ok(Arc::new(InMemoryBackend::with_partitions(&partitions::ALL)))
        },
        "rocksdb" => {
            let phase_start = Instant::now();
            let db_path = config.storage.rocksdb_dir();
            let db = RocksDbInit::new(db_path.clone()).open()?;
            info!(
                "RocksDB initialized at {} ({:.2}ms)",
                db_path,
                phase_start.elapsed().as_secs_f64() * 1000.0
            );
            Ok(Arc::new(RocksDBBackend::new(db)))
        },
        other => Err(anyhow::anyhow!("Unknown storage backend '{}'", other)),
    }
}

/// Initialize storage, the session manager and the API services.
pub async fn bootstrap(config: &ServerConfig) -> Result<ApplicationComponents> {
    let backend = open_backend(config)?;
    bootstrap_with_backend(config, backend)
}

/// Build every component on top of an already opened backend.
pub fn bootstrap_with_backend(
    config: &ServerConfig,
    backend: Arc<dyn StorageBackend>,
) -> Result<ApplicationComponents> {
    let users = Arc::new(UserStore::new(backend.clone()));
    let jobs = Arc::new(JobStore::new(backend.clone()));

    if config.auth.uses_default_secrets() {
        warn!("Token secrets are the built-in development values; set PORTAL_ACCESS_TOKEN_SECRET and PORTAL_REFRESH_TOKEN_SECRET in production");
    }
    if !config.auth.cookie_secure {
        warn!("Auth cookies are sent without the Secure flag");
    }

    let codec = TokenCodec::from_settings(&config.auth);
    let policy = PasswordPolicy::from_settings(&config.auth);
    let repo = Arc::new(StoreUserRepo::new(users.clone()));
    let session = SessionManager::new(repo, codec, policy);
    debug!(
        "Session manager ready (access ttl {} min, refresh ttl {} days)",
        config.auth.access_token_expiry_minutes, config.auth.refresh_token_expiry_days
    );

    std::fs::create_dir_all(&config.uploads.temp_dir)?;
    std::fs::create_dir_all(&config.uploads.media_dir)?;
    let images = Arc::new(LocalImageHost::new(
        &config.uploads.media_dir,
        config.uploads.public_base_url.clone(),
    ));
    info!(
        "Images stored in {} and served from {}",
        config.uploads.media_dir, config.uploads.public_base_url
    );

    let state = AppState {
        session: web::Data::new(session),
        accounts: web::Data::new(AccountService::new(
            users.clone(),
            jobs.clone(),
            images,
            policy,
        )),
        jobs: web::Data::new(JobService::new(jobs.clone())),
        cookies: web::Data::new(CookieConfig::with_secure(config.auth.cookie_secure)),
        uploads: web::Data::new(config.uploads.clone()),
        max_json_payload: config.server.max_json_payload,
    };

    Ok(ApplicationComponents {
        backend,
        users,
        jobs,
        state,
    })
}

/// Start the HTTP server and block until it stops.
pub async fn run(config: &ServerConfig, components: ApplicationComponents) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let cors_config = config.security.cors.clone();
    let state = components.state;

    let workers = if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    };

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors_from_config(&cors_config))
            .configure(move |cfg| state.configure(cfg))
    })
    .bind(&bind_addr)?
    .workers(workers);

    info!("Listening on http://{} with {} workers", bind_addr, workers);
    server.run().await?;
    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir, backend: &str) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.storage.backend = backend.to_string();
        config.storage.data_path = dir.path().join("data").display().to_string();
        config.uploads.temp_dir = dir.path().join("temp").display().to_string();
        config.uploads.media_dir = dir.path().join("media").display().to_string();
        config
    }

    #[tokio::test]
    async fn test_bootstrap_memory_backend() {
        let dir = TempDir::new().unwrap();
        let components = bootstrap(&config(&dir, "memory")).await.unwrap();
        assert!(components.users.get_by_username("nobody").unwrap().is_none());
        assert!(dir.path().join("media").is_dir());
        assert!(dir.path().join("temp").is_dir());
    }

    #[tokio::test]
    async fn test_bootstrap_rocksdb_backend() {
        let dir = TempDir::new().unwrap();
        let components = bootstrap(&config(&dir, "rocksdb")).await.unwrap();
        assert!(components.jobs.list().unwrap().is_empty());
        assert!(dir.path().join("data").join("rocksdb").is_dir());
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(open_backend(&config(&dir, "postgres")).is_err());
    }
}
