//! # Scheduler Constants
//!
//! Defaults and environment variable names shared by the configuration,
//! logging and progress modules.

/// Batch size used when none is configured
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Default progress line: `3 / 10 ======---------- 30% 4.2s`
pub const DEFAULT_PROGRESS_FORMAT: &str = ":current / :total :bar :percent :etas";

/// Default outer line of a [`NestedProgressBar`](crate::progress::NestedProgressBar)
pub const DEFAULT_NESTED_PROGRESS_FORMAT: &str = "(:percent) :bar [:current/:total] :subbar";

pub const DEFAULT_BAR_WIDTH: usize = 40;
pub const NESTED_OUTER_BAR_WIDTH: usize = 60;
pub const NESTED_INNER_BAR_WIDTH: usize = 20;

/// Fraction of a delay that [`wait`](crate::utils::wait) may add or remove
pub const WAIT_JITTER_FACTOR: f64 = 0.2;

pub mod env {
    /// Prefix for configuration overrides, e.g. `SALTICIDAE_BATCH_SIZE=4`
    pub const CONFIG_PREFIX: &str = "SALTICIDAE";

    /// Standard tracing filter override
    pub const RUST_LOG: &str = "RUST_LOG";
}

