//! Logging for the modern-python-skill CLI, built on the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `MPSKILL_LOG`: Filter directive (like `RUST_LOG`), e.g., `mpskill_skills=debug`
//! - `MPSKILL_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `MPSKILL_LOG_FILE`: Enable daily-rolling JSON logs under `~/.modern-python-skill/logs/` (true/false)
//!
//! # Example
//!
//! ```no_run
//! use mpskill_core::logging::{self, LoggingConfig};
//!
//! let _guard = logging::init_logging(LoggingConfig::default().with_level("debug"))?;
//! # Ok::<(), mpskill_core::Error>(())
//! ```

use crate::Error;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "MPSKILL_LOG";
const LOG_FORMAT_ENV: &str = "MPSKILL_LOG_FORMAT";
const LOG_FILE_ENV: &str = "MPSKILL_LOG_FILE";
const LOG_FILE_PREFIX: &str = "modern-python-skill.log";

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

/// Logging settings assembled from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level for stderr output.
    pub level: String,
    /// Directory for rolling log files, when file logging is enabled.
    pub file_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), file_dir: None }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Write JSON logs into `dir` as well as stderr.
    pub fn with_file_logging(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file_dir = Some(dir.into());
        self
    }

    /// Enable file logging into `dir` when `MPSKILL_LOG_FILE` is truthy.
    pub fn with_file_logging_from_env(self, dir: impl Into<PathBuf>) -> Self {
        let enabled = env::var(LOG_FILE_ENV)
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        if enabled { self.with_file_logging(dir) } else { self }
    }

    /// Build an EnvFilter from this config and environment variables.
    fn build_env_filter(&self) -> EnvFilter {
        let filter = env::var(LOG_ENV)
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone());

        EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    /// Determine the appropriate format for stderr output.
    fn detect_format() -> LogFormat {
        if let Ok(fmt_str) = env::var(LOG_FORMAT_ENV)
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }
        if Self::is_tty() { LogFormat::Pretty } else { LogFormat::Compact }
    }
}

/// Install the global tracing subscriber.
///
/// Sets up an env-based filter (`MPSKILL_LOG`, then `RUST_LOG`, then the configured level),
/// formatted stderr output and, when configured, a daily-rolling JSON file.
///
/// The returned guard flushes the file writer; hold it until the process exits.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>, Error> {
    let env_filter = config.build_env_filter();
    let format = LoggingConfig::detect_format();

    let registry = Registry::default().with(env_filter);

    let (file_layer, guard) = match &config.file_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)
                .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;
            let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().json().with_writer(non_blocking)), Some(guard))
        }
        None => (None, None),
    };
    let registry = registry.with(file_layer);

    let result = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true))
            .try_init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(io::stderr)).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact().with_writer(io::stderr)).try_init(),
    };
    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

/// Sanitize file paths for logging (home directory shown as `~`).
pub fn sanitize_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }

    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse_str("Compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse_str("invalid"), None);
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert!(config.file_dir.is_none());
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::new()
            .with_level("debug")
            .with_file_logging("/tmp/logs");

        assert_eq!(config.level, "debug");
        assert_eq!(config.file_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn test_sanitize_path() {
        if let Some(home) = dirs::home_dir() {
            let test_path = home.join(".modern-python-skill").join("config.yaml");
            assert_eq!(sanitize_path(&test_path), "~/.modern-python-skill/config.yaml");
        }

        let abs_path = PathBuf::from("/var/log/test.log");
        assert_eq!(sanitize_path(&abs_path), "/var/log/test.log");
    }
}
