//! Batch runner: sequential batches of concurrently started tasks.

use futures::future::poll_fn;
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::task::Poll;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use super::chunk::chunk;
use super::runner::{drive_units, run_task};
use super::{RunMode, RunOptions, RunSummary};
use crate::error::SchedulerError;

/// Run `tasks` in consecutive batches of `batch_size`.
///
/// All tasks of a batch are spawned together onto the tokio runtime; the next
/// batch starts only once the current one has been joined. The join is
/// fail-fast: the batch fails with the first error it observes, and members
/// still in flight keep running detached with their outcomes ignored.
///
/// When several members have already failed by the time the join looks at
/// them, the one that was started first (lowest index) is reported.
///
/// Progress is advanced once per batch. A `batch_size` of zero is rejected
/// with [`SchedulerError::InvalidBatchSize`] before anything runs.
pub async fn run_in_batches<I, F, Fut, T, E>(
    tasks: I,
    batch_size: usize,
    options: &RunOptions,
) -> Result<RunSummary, SchedulerError<E>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let batches = chunk(tasks, batch_size)?;
    let tasks_total: usize = batches.iter().map(Vec::len).sum();
    let task_timeout = options.task_timeout;

    let mut first_index = 0;
    let units: Vec<_> = batches
        .into_iter()
        .map(|batch| {
            let offset = first_index;
            first_index += batch.len();
            move || join_batch(batch, offset, task_timeout)
        })
        .collect();

    drive_units(units, tasks_total, options, RunMode::Batches).await
}

/// Spawn every member of `batch` and wait on them with a fail-fast join
async fn join_batch<F, Fut, T, E>(
    batch: Vec<F>,
    first_index: usize,
    timeout: Option<Duration>,
) -> Result<(), SchedulerError<E>>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    debug!(first_task = first_index, size = batch.len(), "Spawning batch");

    let handles: Vec<JoinHandle<Result<T, SchedulerError<E>>>> = batch
        .into_iter()
        .enumerate()
        .map(|(offset, task)| tokio::spawn(run_task(task, first_index + offset, timeout)))
        .collect();

    fan_in(handles, first_index).await
}

/// Resolve once every handle has succeeded, or as soon as one has failed
///
/// Handles are polled in index order on every wake-up, so among failures
/// observed in the same pass the lowest index wins. Handles left behind on
/// failure are dropped, which detaches their tasks without aborting them.
async fn fan_in<T, E>(
    handles: Vec<JoinHandle<Result<T, SchedulerError<E>>>>,
    first_index: usize,
) -> Result<(), SchedulerError<E>> {
    let mut pending: Vec<Option<JoinHandle<Result<T, SchedulerError<E>>>>> =
        handles.into_iter().map(Some).collect();

    poll_fn(|cx| {
        let mut outstanding = false;

        for (offset, slot) in pending.iter_mut().enumerate() {
            let Some(handle) = slot.as_mut() else {
                continue;
            };

            match Pin::new(handle).poll(cx) {
                Poll::Pending => outstanding = true,
                Poll::Ready(joined) => {
                    *slot = None;
                    match joined {
                        Ok(Ok(_)) => {}
                        Ok(Err(err)) => return Poll::Ready(Err(err)),
                        Err(join_err) => {
                            return Poll::Ready(Err(join_failure(first_index + offset, join_err)))
                        }
                    }
                }
            }
        }

        if outstanding {
            Poll::Pending
        } else {
            Poll::Ready(Ok(()))
        }
    })
    .await
}

fn join_failure<E>(index: usize, err: JoinError) -> SchedulerError<E> {
    let message = if err.is_panic() {
        panic_message(err.into_panic())
    } else {
        "task was cancelled by the runtime".to_string()
    };
    SchedulerError::TaskPanicked { index, message }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressCounter;
    use futures::future::{BoxFuture, FutureExt};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_zero_batch_size_is_rejected() {
        let tasks = vec![|| async { Ok::<_, String>(()) }];
        let err = run_in_batches(tasks, 0, &RunOptions::new()).await.unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidBatchSize { batch_size: 0 }));
    }

    #[tokio::test]
    async fn test_empty_task_list_completes() {
        let tasks: Vec<fn() -> std::future::Ready<Result<(), String>>> = Vec::new();
        let summary = run_in_batches(tasks, 3, &RunOptions::new()).await.unwrap();
        assert_eq!(summary.units_total, 0);
        assert_eq!(summary.tasks_total, 0);
    }

    #[tokio::test]
    async fn test_summary_counts_batches() {
        let counter = Arc::new(ProgressCounter::new());
        let tasks: Vec<_> = (0..5).map(|n| move || async move { Ok::<_, String>(n) }).collect();

        let summary = run_in_batches(tasks, 2, &RunOptions::new().with_progress(counter.clone()))
            .await
            .unwrap();

        assert_eq!(summary.mode, RunMode::Batches);
        assert_eq!(summary.tasks_total, 5);
        assert_eq!(summary.units_total, 3);
        assert_eq!(summary.units_succeeded, 3);
        assert_eq!(counter.count(), 3);
    }

    type BoxedTask = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), String>> + Send>;

    fn explode() -> Result<(), String> {
        panic!("scraper exploded")
    }

    #[tokio::test]
    async fn test_panicking_member_is_reported() {
        let tasks: Vec<BoxedTask> = vec![
            Box::new(|| async { Ok::<(), String>(()) }.boxed()),
            Box::new(|| async { explode() }.boxed()),
        ];

        let err = run_in_batches(tasks, 2, &RunOptions::new()).await.unwrap_err();
        match err {
            SchedulerError::TaskPanicked { index, message } => {
                assert_eq!(index, 1);
                assert_eq!(message, "scraper exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42_u8)), "non-string panic payload");
    }
}
