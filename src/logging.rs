//! # Structured Logging Module
//!
//! Console logging for scripts built on the runners. Verbosity is passed in
//! explicitly as a [`LogMode`] instead of being flipped on a global switch.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the binary, usually through [`init_logging`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::env::RUST_LOG;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// How chatty the console should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Regular messages and errors only
    #[default]
    Quiet,
    /// Also per-task debug output
    Verbose,
}

impl LogMode {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_directive(self) -> &'static str {
        match self {
            LogMode::Quiet => "info",
            LogMode::Verbose => "debug",
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogMode::Quiet => write!(f, "quiet"),
            LogMode::Verbose => write!(f, "verbose"),
        }
    }
}

/// Console output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Build the filter for `mode`, letting `RUST_LOG` win when present
fn build_filter(mode: LogMode) -> EnvFilter {
    match std::env::var(RUST_LOG) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(mode.default_directive()),
    }
}

/// Initialize console logging once per process
///
/// Subsequent calls are no-ops, and an already-installed global subscriber is
/// left in place.
pub fn init_logging(mode: LogMode, format: LogFormat) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let layer = match format {
            LogFormat::Pretty => tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(build_filter(mode))
                .boxed(),
            LogFormat::Json => tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(build_filter(mode))
                .boxed(),
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::debug!(
                mode = %mode,
                json = matches!(format, LogFormat::Json),
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        }
    });
}

/// Log the outcome of a finished run
pub fn log_run_completed(
    run_id: &str,
    label: Option<&str>,
    mode: &str,
    units_total: usize,
    units_failed: usize,
    duration_ms: u64,
) {
    tracing::info!(
        run_id = %run_id,
        label = label,
        mode = %mode,
        units_total = units_total,
        units_failed = units_failed,
        duration_ms = duration_ms,
        timestamp = %Utc::now().to_rfc3339(),
        "Run completed"
    );
}

/// Log a run that stopped on an error
pub fn log_run_failed(run_id: &str, label: Option<&str>, mode: &str, unit: usize, error: &str) {
    tracing::error!(
        run_id = %run_id,
        label = label,
        mode = %mode,
        unit = unit,
        error = %error,
        timestamp = %Utc::now().to_rfc3339(),
        "Run failed"
    );
}
