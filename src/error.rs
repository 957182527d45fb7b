//! # Scheduler Error Types
//!
//! Structured error handling for the sequencing utilities using thiserror.
//! Task errors are carried through unmodified so callers keep the root cause.

use thiserror::Error;

/// Batch size rejected by [`chunk`](crate::sequence::chunk) and the batch runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid batch size: {batch_size} (must be at least 1)")]
pub struct InvalidBatchSize {
    pub batch_size: usize,
}

/// Errors surfaced by a sequential or batched run
///
/// `E` is the error type produced by the tasks themselves. A failing task's
/// error is returned as-is inside [`SchedulerError::TaskFailed`].
#[derive(Debug, Error)]
pub enum SchedulerError<E> {
    /// The batch size was zero
    #[error("Invalid batch size: {batch_size} (must be at least 1)")]
    InvalidBatchSize { batch_size: usize },

    /// A task settled with an error
    #[error("Task failed: {0}")]
    TaskFailed(E),

    /// A task did not settle within the configured per-task timeout
    #[error("Task {index} timed out after {timeout_ms}ms")]
    TaskTimedOut { index: usize, timeout_ms: u64 },

    /// A spawned batch member panicked before settling
    #[error("Task {index} panicked: {message}")]
    TaskPanicked { index: usize, message: String },

    /// The run was cancelled before every unit had started
    #[error("Run cancelled after {units_completed} of {units_total} units")]
    Cancelled {
        units_completed: usize,
        units_total: usize,
    },
}

impl<E> SchedulerError<E> {
    /// Borrow the task's own error if this is a task failure
    pub fn task_error(&self) -> Option<&E> {
        match self {
            SchedulerError::TaskFailed(err) => Some(err),
            _ => None,
        }
    }

    /// Unwrap into the task's own error if this is a task failure
    pub fn into_task_error(self) -> Option<E> {
        match self {
            SchedulerError::TaskFailed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SchedulerError::Cancelled { .. })
    }
}

impl<E> From<InvalidBatchSize> for SchedulerError<E> {
    fn from(err: InvalidBatchSize) -> Self {
        SchedulerError::InvalidBatchSize {
            batch_size: err.batch_size,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigurationError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failures of an external command run through [`crate::process`]
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The command could not be started at all
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but did not exit successfully; `code` is `None` when
    /// it was terminated by a signal
    #[error("`{command}` exited with {}", exit_description(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl ProcessError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessError::NonZeroExit { code, .. } => *code,
            ProcessError::Spawn { .. } => None,
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

pub type Result<T, E> = std::result::Result<T, SchedulerError<E>>;
pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
pub type ProcessResult<T> = std::result::Result<T, ProcessError>;
