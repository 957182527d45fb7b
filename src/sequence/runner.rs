//! Sequential runner and the unit loop shared with the batch runner.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use super::{FailurePolicy, RunMode, RunOptions, RunSummary};
use crate::error::SchedulerError;
use crate::logging::{log_run_completed, log_run_failed};

/// Run `tasks` one at a time, in order.
///
/// Each task is started only after the previous one has settled. The
/// progress reporter, if any, is advanced once per task right before it
/// starts. See the [module docs](super) for how failures are handled.
///
/// ```rust
/// use salticidae::sequence::{run_in_sequence, RunOptions};
/// use std::sync::{Arc, Mutex};
///
/// # async fn example() {
/// let output = Arc::new(Mutex::new(Vec::new()));
/// let tasks: Vec<_> = (1..=3)
///     .map(|n| {
///         let output = output.clone();
///         move || async move {
///             output.lock().unwrap().push(n);
///             Ok::<_, String>(())
///         }
///     })
///     .collect();
///
/// run_in_sequence(tasks, &RunOptions::new()).await.unwrap();
/// assert_eq!(*output.lock().unwrap(), vec![1, 2, 3]);
/// # }
/// ```
pub async fn run_in_sequence<I, F, Fut, T, E>(
    tasks: I,
    options: &RunOptions,
) -> Result<RunSummary, SchedulerError<E>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let task_timeout = options.task_timeout;
    let units: Vec<_> = tasks
        .into_iter()
        .enumerate()
        .map(|(index, task)| move || run_task(task, index, task_timeout))
        .collect();
    let tasks_total = units.len();

    drive_units(units, tasks_total, options, RunMode::Sequence).await
}

/// Invoke one task, applying the optional timeout and wrapping its error
pub(crate) async fn run_task<F, Fut, T, E>(
    task: F,
    index: usize,
    timeout: Option<Duration>,
) -> Result<T, SchedulerError<E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let pending = task();
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, pending).await {
            Ok(settled) => settled.map_err(SchedulerError::TaskFailed),
            Err(_) => Err(SchedulerError::TaskTimedOut {
                index,
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }),
        },
        None => pending.await.map_err(SchedulerError::TaskFailed),
    }
}

/// Start `units` strictly one after another, honoring progress, cancellation
/// and the failure policy
pub(crate) async fn drive_units<U, Fut, O, E>(
    units: Vec<U>,
    tasks_total: usize,
    options: &RunOptions,
    mode: RunMode,
) -> Result<RunSummary, SchedulerError<E>>
where
    U: FnOnce() -> Fut,
    Fut: Future<Output = Result<O, SchedulerError<E>>>,
    E: Display,
{
    let run_id = Uuid::new_v4();
    let units_total = units.len();
    let span = info_span!(
        "run",
        run_id = %run_id,
        label = options.label.as_deref(),
        mode = mode.as_str(),
        units_total = units_total,
    );

    async move {
        let started_at = Instant::now();
        let mut units_started = 0;
        let mut units_succeeded = 0;
        let mut units_failed = 0;

        for (index, unit) in units.into_iter().enumerate() {
            // Every started unit has settled by now, so started == completed
            if options.is_cancelled() {
                warn!(
                    units_completed = units_started,
                    units_total = units_total,
                    "Run cancelled before unit {index} started"
                );
                return Err(SchedulerError::Cancelled {
                    units_completed: units_started,
                    units_total,
                });
            }

            options.advance_progress();
            units_started += 1;
            debug!(unit = index, "Unit started");

            match unit().await {
                Ok(_) => {
                    units_succeeded += 1;
                    debug!(unit = index, "Unit settled");
                }
                Err(err) => {
                    units_failed += 1;
                    match options.failure_policy {
                        FailurePolicy::FailFast => {
                            log_run_failed(
                                &run_id.to_string(),
                                options.label.as_deref(),
                                mode.as_str(),
                                index,
                                &err.to_string(),
                            );
                            return Err(err);
                        }
                        FailurePolicy::ContinueOnError => {
                            warn!(unit = index, error = %err, "Unit failed, continuing with the next one");
                        }
                    }
                }
            }
        }

        let elapsed = started_at.elapsed();
        log_run_completed(
            &run_id.to_string(),
            options.label.as_deref(),
            mode.as_str(),
            units_total,
            units_failed,
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        );

        Ok(RunSummary {
            run_id,
            label: options.label.clone(),
            mode,
            tasks_total,
            units_total,
            units_started,
            units_succeeded,
            units_failed,
            elapsed,
        })
    }
    .instrument(span)
    .await
}
