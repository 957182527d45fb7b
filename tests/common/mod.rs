//! Shared helpers for the runner integration tests: an event log that tasks
//! write into, and builders for tasks that succeed or fail after a delay.

#![allow(dead_code)]

use futures::future::{BoxFuture, FutureExt};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Started(usize),
    Settled(usize),
}

/// Ordered record of task starts and settlements
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn started(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Started(id) => Some(id),
                Event::Settled(_) => None,
            })
            .collect()
    }

    pub fn settled(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Settled(id) => Some(id),
                Event::Started(_) => None,
            })
            .collect()
    }

    /// Position of `event` in the log
    pub fn position(&self, event: Event) -> Option<usize> {
        self.events().iter().position(|logged| *logged == event)
    }
}

/// Boxed so tasks built by different helpers fit in one list
pub type TestTask = Box<dyn FnOnce() -> BoxFuture<'static, Result<usize, String>> + Send>;

/// Task `id` that waits `delay` and succeeds with its id
pub fn delayed_ok(log: &EventLog, id: usize, delay: Duration) -> TestTask {
    delayed(log, id, delay, None)
}

/// Task `id` that waits `delay` and fails with `message`
pub fn delayed_fail(log: &EventLog, id: usize, delay: Duration, message: &str) -> TestTask {
    delayed(log, id, delay, Some(message.to_string()))
}

/// Shared shape of every test task; `Some(message)` makes it fail
pub fn delayed(log: &EventLog, id: usize, delay: Duration, failure: Option<String>) -> TestTask {
    let log = log.clone();
    Box::new(move || {
        log.record(Event::Started(id));
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            log.record(Event::Settled(id));
            match failure {
                Some(message) => Err(message),
                None => Ok(id),
            }
        }
        .boxed()
    })
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
