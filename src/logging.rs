//! Structured logging configuration.
//!
//! Two ways to get router events out:
//!
//! - [`init_logging`] installs a process-wide `tracing` subscriber, configured
//!   from the environment with [`LogConfig::from_env`]. Suitable for binaries.
//! - [`log_port`] builds a self-contained [`tracing::Dispatch`] for one
//!   [`Dispatcher`](crate::dispatcher::Dispatcher), writing to any
//!   [`MakeWriter`] in the chosen format. Events from `handle` go there no
//!   matter what the global subscriber is.
//!
//! The dispatcher emits three events per request at fixed points:
//! `"handling incoming request"`, `"finished handling request"` and, when a
//! handler panics, `"recovered from panic"`.

use anyhow::{Context, Result};
use std::env;
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty or compact for development
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Json, // Default to JSON
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    /// Log format: json/pretty/compact
    pub format: LogFormat,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    ///
    /// - `LUX_LOG_LEVEL` (default `info`)
    /// - `LUX_LOG_FORMAT` (default `json`)
    /// - `LUX_LOG_INCLUDE_LOCATION` (default `false`)
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("LUX_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("LUX_LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            include_location: env::var("LUX_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Create a default configuration for local runs
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
        }
    }

    /// Create a default production configuration
    pub fn default_prod() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            include_location: false,
        }
    }

    /// The configured level, falling back to `INFO` for unknown values
    pub fn level(&self) -> Level {
        parse_level(&self.log_level)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::default_prod()
    }
}

fn parse_level(s: &str) -> Level {
    match s.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the process-wide subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}

/// Build a logging port that writes to `writer` in `format`.
///
/// The returned dispatch is independent of the global subscriber; events at
/// `level` and above are recorded.
pub fn log_port<W>(writer: W, format: LogFormat, level: Level) -> Dispatch
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(true);

    match format {
        LogFormat::Json => Dispatch::new(builder.json().finish()),
        LogFormat::Pretty => Dispatch::new(builder.pretty().finish()),
        LogFormat::Compact => Dispatch::new(builder.compact().finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Json);
    }

    #[test]
    fn test_log_config_defaults() {
        let dev = LogConfig::default_dev();
        assert_eq!(dev.level(), Level::DEBUG);
        assert_eq!(dev.format, LogFormat::Pretty);

        let prod = LogConfig::default();
        assert_eq!(prod.level(), Level::INFO);
        assert_eq!(prod.format, LogFormat::Json);
        assert!(!prod.include_location);
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        assert_eq!(parse_level("loud"), Level::INFO);
        assert_eq!(parse_level("WARN"), Level::WARN);
    }

    #[test]
    fn test_log_port_writes_json_lines() {
        let buffer = Buffer::default();
        let port = log_port(buffer.clone(), LogFormat::Json, Level::INFO);

        tracing::dispatcher::with_default(&port, || {
            tracing::info!(request_id = "abc", "hello");
            tracing::debug!("filtered out");
        });

        let out = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 1);
        let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event["fields"]["message"], "hello");
        assert_eq!(event["fields"]["request_id"], "abc");
        assert_eq!(event["level"], "INFO");
    }
}
