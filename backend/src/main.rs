// Portal Server entrypoint
//!
//! The heavy lifting (initialization, middleware wiring) lives in dedicated
//! modules so this file remains a thin orchestrator.

use anyhow::Result;
use log::info;
use portal_configs::ServerConfig;
use portal_server::lifecycle::{bootstrap, run};
use portal_server::logging;
use std::env;

#[actix_web::main]
async fn main() -> Result<()> {
    // First argument: config path
    let config_path = env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());

    let config = match ServerConfig::load_or_default(&config_path) {
        Ok(cfg) => {
            eprintln!(
                "Loaded config from: {}",
                std::fs::canonicalize(&config_path)
                    .unwrap_or_else(|_| std::path::PathBuf::from(&config_path))
                    .display()
            );
            cfg
        },
        Err(e) => {
            eprintln!("FATAL: Failed to load {}: {}", config_path, e);
            eprintln!("Server cannot start without valid configuration");
            std::process::exit(1);
        },
    };

    // Logging before any other side effects
    let server_log_path = format!("{}/server.log", config.logging.logs_path);
    logging::init_logging(
        &config.logging.level,
        &server_log_path,
        config.logging.log_to_console,
        Some(&config.logging.targets),
        &config.logging.format,
    )?;

    let version = env!("CARGO_PKG_VERSION");
    info!("╔═══════════════════════════════════════════════════════════════╗");
    info!("║           Portal Server v{:<38} ║", version);
    info!("╚═══════════════════════════════════════════════════════════════╝");
    info!(
        "Host: {}  Port: {}  Storage: {}",
        config.server.host, config.server.port, config.storage.backend
    );

    let components = bootstrap(&config).await?;

    // Run HTTP server until termination signal is received
    run(&config, components).await
}
