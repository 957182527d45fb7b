//! # Task Sequencing
//!
//! Run a list of deferred async operations either strictly one at a time
//! ([`run_in_sequence`]) or in fixed-size concurrent groups
//! ([`run_in_batches`]).
//!
//! A task is any `FnOnce() -> impl Future<Output = Result<T, E>>`. Task values
//! are discarded; tasks that need to hand data back should capture a sink.
//!
//! ## Failure handling
//!
//! - [`FailurePolicy::FailFast`] (default): the first failing unit ends the
//!   run and its error comes back unmodified in
//!   [`SchedulerError::TaskFailed`](crate::error::SchedulerError::TaskFailed).
//!   Nothing after it is started.
//! - [`FailurePolicy::ContinueOnError`]: every unit is started and settled in
//!   order; failures are logged and counted in [`RunSummary::units_failed`]
//!   and the run itself resolves `Ok`.
//!
//! A *unit* is a task in sequential mode and a whole batch in batch mode.
//! Inside a batch the join is always fail-fast: the batch fails as soon as
//! one member fails, while the remaining members keep running in the
//! background.
//!
//! ## Example
//!
//! ```rust
//! use salticidae::sequence::{run_in_batches, RunOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tasks: Vec<_> = (1..=5)
//!     .map(|page| move || async move { Ok::<_, std::io::Error>(page * 2) })
//!     .collect();
//!
//! let summary = run_in_batches(tasks, 2, &RunOptions::new().with_label("pages")).await?;
//! assert_eq!(summary.units_total, 3);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod chunk;
pub mod runner;

pub use batch::run_in_batches;
pub use chunk::{batch_count, chunk};
pub use runner::run_in_sequence;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::progress::ProgressReporter;

/// What a run does after a unit fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure and return it
    #[default]
    FailFast,
    /// Keep starting units; count failures in the summary
    ContinueOnError,
}

/// Which runner produced a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Sequence,
    Batches,
}

impl RunMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Sequence => "sequence",
            RunMode::Batches => "batches",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run settings shared by both runners
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Attached to the run's tracing span; has no effect on behavior
    pub label: Option<String>,
    /// Advanced once per unit, immediately before the unit starts
    pub progress: Option<Arc<dyn ProgressReporter>>,
    pub failure_policy: FailurePolicy,
    /// Once cancelled, units that have not started yet are skipped
    pub cancellation: Option<CancellationToken>,
    /// Upper bound on each individual task
    pub task_timeout: Option<Duration>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_progress<P>(mut self, progress: Arc<P>) -> Self
    where
        P: ProgressReporter + 'static,
    {
        self.progress = Some(progress);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Shorthand for [`FailurePolicy::ContinueOnError`]
    pub fn continue_on_error(self) -> Self {
        self.with_failure_policy(FailurePolicy::ContinueOnError)
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    pub(crate) fn advance_progress(&self) {
        if let Some(progress) = &self.progress {
            progress.advance();
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("label", &self.label)
            .field("progress", &self.progress.is_some())
            .field("failure_policy", &self.failure_policy)
            .field("cancellation", &self.cancellation.is_some())
            .field("task_timeout", &self.task_timeout)
            .finish()
    }
}

/// Record of a run that reached its end
///
/// Never carries task values. Units are tasks in sequential mode and batches
/// in batch mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub label: Option<String>,
    pub mode: RunMode,
    pub tasks_total: usize,
    pub units_total: usize,
    pub units_started: usize,
    pub units_succeeded: usize,
    pub units_failed: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// True when every unit succeeded
    pub fn is_clean(&self) -> bool {
        self.units_failed == 0 && self.units_succeeded == self.units_total
    }
}
