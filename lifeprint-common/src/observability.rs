//! Logging setup for the index binary and integration tests.
//!
//! [`init_logging`] installs one global `tracing` subscriber that writes to a
//! daily rolling file as text or JSON lines ([`LogFormat`]), optionally
//! mirrored to `stderr` in the same format. Only the first call
//! installs anything; later calls hand back the path resolved the first time.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "LIFEPRINT_LOG_DIR";

type SinkLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{other}` (expected text or json)")),
        }
    }
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Logical name of the component (used for defaults and file names).
    pub app_name: &'static str,
    /// Optional explicit directory for log output. If `None`, we consult
    /// `LIFEPRINT_LOG_DIR` and finally fall back to `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    /// Whether to duplicate events to `stderr` in addition to the file sink.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Default filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "lifeprint-index",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info",
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Returns the log file path for the current day.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let resolved_dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&resolved_dir)
        .with_context(|| format!("failed to create log directory: {}", resolved_dir.display()))?;

    let log_filename = format!("{}.log", config.app_name);
    let today = Local::now().format("%Y-%m-%d").to_string();
    let full_path = resolved_dir.join(format!("{log_filename}.{today}"));

    let appender = rolling::daily(&resolved_dir, &log_filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(sink_layers(config.format, writer, config.emit_stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_PATH.set(full_path.clone());
    Ok(full_path)
}

// The file sink never carries ANSI colour codes.
fn sink_layers(format: LogFormat, file: NonBlocking, emit_stderr: bool) -> Vec<SinkLayer> {
    let mut layers: Vec<SinkLayer> = Vec::with_capacity(2);
    match format {
        LogFormat::Text => {
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .boxed(),
            );
            if emit_stderr {
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .boxed(),
                );
            }
        }
        LogFormat::Json => {
            layers.push(tracing_subscriber::fmt::layer().json().with_writer(file).boxed());
            if emit_stderr {
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .boxed(),
                );
            }
        }
    }
    layers
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }

    if let Ok(env_dir) = std::env::var(LOG_DIR_ENV) {
        return expand_home(Path::new(&env_dir));
    }

    default_data_dir(app_name)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

fn default_data_dir(app_name: &str) -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(app_name),
        Err(_) => PathBuf::from(".").join(app_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins_over_environment() {
        let explicit = tempfile::tempdir().unwrap();
        let from_env = tempfile::tempdir().unwrap();
        temp_env::with_var(LOG_DIR_ENV, Some(from_env.path()), || {
            let dir = resolve_log_dir("lifeprint-index", Some(explicit.path()));
            assert_eq!(dir, explicit.path());
        });
    }

    #[test]
    fn environment_dir_used_without_explicit_one() {
        let from_env = tempfile::tempdir().unwrap();
        temp_env::with_var(LOG_DIR_ENV, Some(from_env.path()), || {
            let dir = resolve_log_dir("lifeprint-index", None);
            assert_eq!(dir, from_env.path());
        });
    }

    #[test]
    fn default_dir_applies_when_environment_unset() {
        temp_env::with_var_unset(LOG_DIR_ENV, || {
            let dir = resolve_log_dir("lifeprint-index", None);
            assert_eq!(dir, default_data_dir("lifeprint-index"));
        });
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" JSON ".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("Text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("yaml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn each_format_builds_file_and_stderr_sinks() {
        for format in [LogFormat::Text, LogFormat::Json] {
            let tmp = tempfile::tempdir().unwrap();
            let (file, _guard) =
                tracing_appender::non_blocking(rolling::never(tmp.path(), "sink.log"));
            assert_eq!(sink_layers(format, file.clone(), false).len(), 1);
            assert_eq!(sink_layers(format, file, true).len(), 2);
        }
    }

    #[test]
    fn non_home_paths_are_left_alone() {
        let p = Path::new("/var/log/lifeprint");
        assert_eq!(expand_home(p), PathBuf::from("/var/log/lifeprint"));
    }

    #[test]
    fn default_dir_ends_with_app_name() {
        let dir = default_data_dir("lifeprint-index");
        assert!(dir.ends_with("lifeprint-index"));
    }
}
