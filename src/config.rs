//! # Scheduler Configuration
//!
//! Layered configuration for scripts driving the runners: built-in defaults,
//! then an optional file (TOML, YAML or JSON, picked by extension), then
//! `SALTICIDAE_*` environment variables.
//!
//! ```rust,no_run
//! use salticidae::config::SchedulerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SchedulerConfig::load(None)?;
//! let options = config.run_options();
//! println!("batch size {} with {:?}", config.batch_size, options.failure_policy);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::constants::{env::CONFIG_PREFIX, DEFAULT_BATCH_SIZE, DEFAULT_PROGRESS_FORMAT};
use crate::error::{ConfigResult, ConfigurationError};
use crate::logging::{self, LogFormat, LogMode};
use crate::progress::ProgressBar;
use crate::sequence::{FailurePolicy, RunOptions};
use crate::utils::serde::deserialize_optional_millis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Tasks started together by the batch runner
    pub batch_size: usize,
    pub failure_policy: FailurePolicy,
    /// Per-task timeout; unset means tasks may run indefinitely
    #[serde(deserialize_with = "deserialize_optional_millis")]
    pub task_timeout_ms: Option<u64>,
    pub log_mode: LogMode,
    pub log_format: LogFormat,
    pub progress_format: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            failure_policy: FailurePolicy::default(),
            task_timeout_ms: None,
            log_mode: LogMode::default(),
            log_format: LogFormat::default(),
            progress_format: DEFAULT_PROGRESS_FORMAT.to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Load from the optional file and the process environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process
    /// environment; keys use the `SALTICIDAE_` prefix as they would in the
    /// real environment
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading scheduler configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(CONFIG_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        let config: SchedulerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            config = %serde_json::to_string(&config).unwrap_or_else(|_| "[serialization error]".to_string()),
            "Scheduler configuration loaded"
        );

        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "batch_size",
                "must be at least 1",
            ));
        }
        if self.task_timeout_ms == Some(0) {
            return Err(ConfigurationError::invalid_value(
                "task_timeout_ms",
                "must be greater than 0 when set",
            ));
        }
        if self.progress_format.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "progress_format",
                "must not be empty",
            ));
        }
        Ok(())
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_ms.map(Duration::from_millis)
    }

    /// Run options carrying the policy and timeout from this configuration
    pub fn run_options(&self) -> RunOptions {
        let options = RunOptions::new().with_failure_policy(self.failure_policy);
        match self.task_timeout() {
            Some(timeout) => options.with_task_timeout(timeout),
            None => options,
        }
    }

    /// Install the console subscriber with the configured mode and format
    pub fn init_logging(&self) {
        logging::init_logging(self.log_mode, self.log_format);
    }

    /// Progress bar over `total` units rendered with the configured format
    pub fn progress_bar(&self, total: usize) -> ProgressBar {
        ProgressBar::with_format(total, self.progress_format.as_str())
    }
}
