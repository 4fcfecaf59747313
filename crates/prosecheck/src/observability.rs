//! Logging setup.
//!
//! Human-readable events go to stderr. A JSON-lines copy of every event is
//! appended to a log file when a writable location is available:
//!
//! 1. `PROSECHECK_LOG_PATH` (explicit file)
//! 2. `PROSECHECK_LOG_DIR` (directory; file is `prosecheck.jsonl`)
//! 3. `log_dir` from configuration
//! 4. the platform data directory

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_PATH_ENV: &str = "PROSECHECK_LOG_PATH";
const LOG_DIR_ENV: &str = "PROSECHECK_LOG_DIR";
const LOG_FILE_NAME: &str = "prosecheck.jsonl";

/// Where log files go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// JSONL log file, or `None` to log to stderr only.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, then `config_log_dir`,
    /// then the platform data directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let log_file = std::env::var_os(LOG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(LOG_DIR_ENV).map(|d| PathBuf::from(d).join(LOG_FILE_NAME)))
            .or_else(|| config_log_dir.map(|d| d.join(LOG_FILE_NAME)))
            .or_else(|| {
                prosecheck_core::config::user_data_local_dir()
                    .map(|d| d.join("logs").join(LOG_FILE_NAME).into_std_path_buf())
            });
        Self { log_file }
    }
}

/// Levels from quietest to loudest.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Build the event filter.
///
/// `RUST_LOG` wins when set. Otherwise `-q` forces `error`, each `-v` raises
/// the configured level one step, stopping at `trace`.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = if quiet {
        "error"
    } else {
        raise_level(config_level, verbose)
    };
    EnvFilter::new(level)
}

fn raise_level(level: &str, steps: u8) -> &str {
    match LEVELS.iter().position(|l| l.eq_ignore_ascii_case(level)) {
        Some(index) => LEVELS[(index + usize::from(steps)).min(LEVELS.len() - 1)],
        None => level,
    }
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
///
/// Returns the file writer guard; dropping it flushes pending lines. A log
/// file that cannot be opened is skipped with a warning.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let mut open_error = None;
    let (file_layer, guard) = match config.log_file {
        Some(ref path) => match open_log_file(path) {
            Ok(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                open_error = Some((path.clone(), e));
                (None, None)
            }
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("global tracing subscriber already set")?;

    if let Some((path, error)) = open_error {
        tracing::warn!(path = %path.display(), %error, "log file unavailable, logging to stderr only");
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_forces_error_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(env_filter(true, 3, "info").to_string(), "error");
    }

    #[test]
    fn verbose_raises_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(env_filter(false, 0, "warn").to_string(), "warn");
        assert_eq!(env_filter(false, 1, "warn").to_string(), "info");
        assert_eq!(env_filter(false, 2, "warn").to_string(), "debug");
    }

    #[test]
    fn each_verbose_flag_is_one_step() {
        assert_eq!(raise_level("error", 1), "warn");
        assert_eq!(raise_level("info", 1), "debug");
        assert_eq!(raise_level("info", 2), "trace");
        assert_eq!(raise_level("debug", 9), "trace");
        assert_eq!(raise_level("Warn", 0), "warn");
    }

    #[test]
    fn config_dir_is_used_without_env() {
        if std::env::var_os(LOG_PATH_ENV).is_some() || std::env::var_os(LOG_DIR_ENV).is_some() {
            return;
        }
        let config = ObservabilityConfig::from_env_with_overrides(Some(PathBuf::from("/tmp/pc")));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/pc").join(LOG_FILE_NAME)));
    }

    #[test]
    fn unwritable_log_path_fails_to_open() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        assert!(open_log_file(&blocker.join("nested").join("log.jsonl")).is_err());
    }
}
