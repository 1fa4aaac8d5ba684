//! Server log setup.
//!
//! Portal crates log through the `log` facade; `LogTracer` forwards those
//! records into the tracing subscriber installed here.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

/// Levels applied to dependencies before `[logging.targets]`.
const QUIET_TARGETS: &[(&str, &str)] = &[
    ("actix_server", "warn"),
    ("actix_http", "warn"),
    ("actix_web", "warn"),
    // access log
    ("actix_web::middleware::logger", "info"),
    ("mio", "warn"),
    ("tracing", "warn"),
];

/// `logging.format` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

pub fn build_env_filter(
    level: &str,
    target_levels: Option<&HashMap<String, String>>,
) -> anyhow::Result<EnvFilter> {
    let configured = target_levels.into_iter().flat_map(|map| map.iter());
    let directives: Vec<String> = std::iter::once(level.to_string())
        .chain(QUIET_TARGETS.iter().map(|(target, lvl)| format!("{}={}", target, lvl)))
        .chain(configured.map(|(target, lvl)| format!("{}={}", target, lvl)))
        .collect();

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

fn file_layer<S>(log_file: File, format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_thread_names(true);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.with_ansi(false).boxed(),
    }
}

/// Install the global subscriber: the log file always, the terminal when
/// `log_to_console` is set. Fails if a subscriber is already installed.
pub fn init_logging(
    level: &str,
    file_path: &str,
    log_to_console: bool,
    target_levels: Option<&HashMap<String, String>>,
    format: &str,
) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(file_path)?;

    // already set when running under the test harness
    tracing_log::LogTracer::init().ok();

    let console_layer = if log_to_console {
        Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(true)
                .with_thread_names(true)
                .with_filter(build_env_filter(level, target_levels)?),
        )
    } else {
        None
    };
    let file_layer = file_layer(log_file, LogFormat::parse(format))
        .with_filter(build_env_filter(level, target_levels)?);

    let subscriber = tracing_subscriber::registry().with(console_layer).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    tracing::trace!(
        "Logging to {} at {} (console: {})",
        file_path,
        level,
        log_to_console
    );
    Ok(())
}
