//! # Progress Reporting
//!
//! The runners only ever call [`ProgressReporter::advance`]. Anything that can
//! count units of work can be handed to a run as `Arc<dyn ProgressReporter>`.
//!
//! Two reporters ship with the crate:
//!
//! - [`ProgressCounter`] - an atomic tally, handy for tests and summaries
//! - [`ProgressBar`] / [`NestedProgressBar`] - text progress lines built from a
//!   format string, emitted through `tracing` on every tick
//!
//! ```rust
//! use salticidae::progress::{ProgressBar, ProgressReporter};
//!
//! let bar = ProgressBar::new(4);
//! bar.advance();
//! assert!(bar.render().starts_with("1 / 4"));
//! ```

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::info;

use crate::constants::{
    DEFAULT_BAR_WIDTH, DEFAULT_NESTED_PROGRESS_FORMAT, DEFAULT_PROGRESS_FORMAT,
    NESTED_INNER_BAR_WIDTH, NESTED_OUTER_BAR_WIDTH,
};

/// Capability advanced once per unit of work a run starts
pub trait ProgressReporter: Send + Sync {
    fn advance(&self);
}

/// Lock-free counter of `advance` calls
#[derive(Debug, Default)]
pub struct ProgressCounter {
    count: AtomicUsize,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

impl ProgressReporter for ProgressCounter {
    fn advance(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }
}

#[derive(Debug)]
struct BarState {
    current: usize,
    total: usize,
    started_at: Instant,
}

/// Text progress bar driven by a format string
///
/// Supported tokens: `:current`, `:total`, `:bar`, `:percent`, `:elapsed`
/// and `:etas`. Unknown tokens are left in place so callers can fill them via
/// [`ProgressBar::render_with`].
#[derive(Debug)]
pub struct ProgressBar {
    format: String,
    width: usize,
    state: Mutex<BarState>,
}

impl ProgressBar {
    pub fn new(total: usize) -> Self {
        Self::with_format(total, DEFAULT_PROGRESS_FORMAT)
    }

    pub fn with_format(total: usize, format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            width: DEFAULT_BAR_WIDTH,
            state: Mutex::new(BarState {
                current: 0,
                total,
                started_at: Instant::now(),
            }),
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn current(&self) -> usize {
        self.state.lock().current
    }

    pub fn total(&self) -> usize {
        self.state.lock().total
    }

    pub fn is_complete(&self) -> bool {
        let state = self.state.lock();
        state.current >= state.total
    }

    /// Advance by one and emit the rendered line
    pub fn tick(&self) {
        self.increment();
        info!(progress = %self.render(), "progress");
    }

    /// Advance by one without emitting anything; saturates at `total`
    pub fn increment(&self) {
        let mut state = self.state.lock();
        if state.current < state.total {
            state.current += 1;
        }
    }

    /// Jump straight to `total`
    pub fn finish(&self) {
        let mut state = self.state.lock();
        state.current = state.total;
    }

    pub fn render(&self) -> String {
        self.render_with(&[])
    }

    /// Render the line, substituting extra `(token, value)` pairs after the
    /// built-in tokens
    pub fn render_with(&self, extra: &[(&str, &str)]) -> String {
        let (current, total, elapsed) = {
            let state = self.state.lock();
            (state.current, state.total, state.started_at.elapsed().as_secs_f64())
        };

        let ratio = if total == 0 {
            1.0
        } else {
            current as f64 / total as f64
        };
        let filled = ((self.width as f64) * ratio).round() as usize;
        let bar = format!(
            "{}{}",
            "=".repeat(filled.min(self.width)),
            "-".repeat(self.width.saturating_sub(filled))
        );
        let eta = if current == 0 {
            "-".to_string()
        } else if current >= total {
            "0.0s".to_string()
        } else {
            let per_unit = elapsed / current as f64;
            format!("{:.1}s", per_unit * (total - current) as f64)
        };

        let mut line = self
            .format
            .replace(":current", &current.to_string())
            .replace(":total", &total.to_string())
            .replace(":bar", &bar)
            .replace(":percent", &format!("{}%", (ratio * 100.0).floor() as u64))
            .replace(":elapsed", &format!("{elapsed:.1}s"))
            .replace(":etas", &eta);

        for (token, value) in extra {
            line = line.replace(token, value);
        }
        line
    }
}

impl ProgressReporter for ProgressBar {
    fn advance(&self) {
        self.tick();
    }
}

/// Outer bar over groups of work, with an inner bar for the current group
///
/// The outer line's `:subbar` token is replaced by the inner bar's rendering.
#[derive(Debug)]
pub struct NestedProgressBar {
    bar: ProgressBar,
    nested: Mutex<Option<ProgressBar>>,
}

impl NestedProgressBar {
    pub fn new(group_count: usize) -> Self {
        Self::with_format(group_count, DEFAULT_NESTED_PROGRESS_FORMAT)
    }

    pub fn with_format(group_count: usize, format: impl Into<String>) -> Self {
        Self {
            bar: ProgressBar::with_format(group_count, format).with_width(NESTED_OUTER_BAR_WIDTH),
            nested: Mutex::new(None),
        }
    }

    /// Begin a new group of `total` items, replacing the previous inner bar
    pub fn start_group(&self, total: usize) {
        let inner = ProgressBar::with_format(total, ":bar :current").with_width(NESTED_INNER_BAR_WIDTH);
        *self.nested.lock() = Some(inner);
    }

    /// Advance the inner bar; a no-op until a group has been started
    pub fn nested_tick(&self) {
        {
            let nested = self.nested.lock();
            match nested.as_ref() {
                Some(inner) => inner.increment(),
                None => return,
            }
        }
        info!(progress = %self.render(), "progress");
    }

    /// Complete the current group and advance the outer bar
    pub fn tick(&self) {
        if let Some(inner) = self.nested.lock().as_ref() {
            inner.finish();
        }
        self.bar.increment();
        info!(progress = %self.render(), "progress");
    }

    pub fn groups_completed(&self) -> usize {
        self.bar.current()
    }

    pub fn render(&self) -> String {
        let subbar = self
            .nested
            .lock()
            .as_ref()
            .map(ProgressBar::render)
            .unwrap_or_default();
        self.bar.render_with(&[(":subbar", &subbar)])
    }
}

impl ProgressReporter for NestedProgressBar {
    fn advance(&self) {
        self.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_counts_advances() {
        let counter = ProgressCounter::new();
        for _ in 0..5 {
            counter.advance();
        }
        assert_eq!(counter.count(), 5);
    }

    #[test]
    fn test_bar_renders_counts_and_percent() {
        let bar = ProgressBar::with_format(4, ":current / :total :percent").with_width(8);
        assert_eq!(bar.render(), "0 / 4 0%");

        bar.tick();
        assert_eq!(bar.render(), "1 / 4 25%");
        assert_eq!(bar.current(), 1);
    }

    #[test]
    fn test_bar_fills_proportionally() {
        let bar = ProgressBar::with_format(4, ":bar").with_width(8);
        bar.increment();
        bar.increment();
        assert_eq!(bar.render(), "====----");

        bar.finish();
        assert_eq!(bar.render(), "========");
        assert!(bar.is_complete());
    }

    #[test]
    fn test_bar_saturates_at_total() {
        let bar = ProgressBar::new(2);
        for _ in 0..5 {
            bar.increment();
        }
        assert_eq!(bar.current(), 2);
        assert!(bar.render().starts_with("2 / 2"));
    }

    #[test]
    fn test_eta_placeholder_before_first_tick() {
        let bar = ProgressBar::with_format(3, ":etas");
        assert_eq!(bar.render(), "-");
        bar.finish();
        assert_eq!(bar.render(), "0.0s");
    }

    #[test]
    fn test_empty_bar_is_complete() {
        let bar = ProgressBar::with_format(0, ":percent");
        assert!(bar.is_complete());
        assert_eq!(bar.render(), "100%");
    }

    #[test]
    fn test_nested_bar_tracks_groups() {
        let nested = NestedProgressBar::with_format(2, "[:current/:total] :subbar");

        // Inner ticks before a group exists are ignored
        nested.nested_tick();
        assert_eq!(nested.render(), "[0/2] ");

        nested.start_group(3);
        nested.nested_tick();
        assert!(nested.render().ends_with(" 1"));

        nested.tick();
        assert_eq!(nested.groups_completed(), 1);
        assert!(nested.render().starts_with("[1/2]"));
        assert!(nested.render().ends_with(" 3"));
    }
}
