//! Structured logging through `tracing`.
//!
//! Progress lines, run summaries and the per-event hit dump are all emitted
//! as `tracing` events. [`init_logging`] installs the global subscriber once
//! per process; `RUST_LOG` overrides the configured level unless an explicit
//! filter is set.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt as tfmt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub timestamps: bool,
    /// Tag records with the emitting thread (`worker-N` inside a pool).
    pub thread_names: bool,
    /// Directive string such as `segment_calorimetry::sensor=debug`.
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            timestamps: true,
            thread_names: true,
            filter: None,
        }
    }
}

impl LogConfig {
    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.to_string());
        match &self.filter {
            Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }
}

/// Installs the global subscriber writing to stderr.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is kept.
pub fn init_logging(config: &LogConfig) -> bool {
    let base = tfmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_names(config.thread_names)
        .with_target(false);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match (config.format, config.timestamps) {
        (LogFormat::Pretty, true) => base.pretty().boxed(),
        (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => base.compact().boxed(),
        (LogFormat::Compact, false) => base.compact().without_time().boxed(),
        (LogFormat::Json, true) => base.json().boxed(),
        (LogFormat::Json, false) => base.json().without_time().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(config.env_filter())
        .try_init()
        .is_ok()
}
