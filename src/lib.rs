#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Salticidae
//!
//! Helpers for small scraping scripts, centred on running lists of async
//! operations either one at a time or in fixed-size concurrent batches.
//!
//! ## Module Organization
//!
//! - [`sequence`] - sequential and batched runners, chunking
//! - [`progress`] - progress reporter capability and text progress bars
//! - [`config`] - layered configuration (file + environment)
//! - [`logging`] - console logging setup with explicit verbosity
//! - [`process`] - external commands as task bodies
//! - [`error`] - structured error types
//! - [`utils`] - zero padding and jittered delays
//!
//! ## Quick Start
//!
//! ```rust
//! use salticidae::progress::ProgressCounter;
//! use salticidae::sequence::{run_in_sequence, RunOptions};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let progress = Arc::new(ProgressCounter::new());
//! let urls = ["/a", "/b", "/c"];
//!
//! let tasks: Vec<_> = urls
//!     .iter()
//!     .map(|url| move || async move { Ok::<_, std::io::Error>(url.len()) })
//!     .collect();
//!
//! let options = RunOptions::new().with_label("pages").with_progress(progress.clone());
//! run_in_sequence(tasks, &options).await?;
//! assert_eq!(progress.count(), 3);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod process;
pub mod progress;
pub mod sequence;
pub mod utils;

pub use config::SchedulerConfig;
pub use error::{ConfigurationError, InvalidBatchSize, ProcessError, Result, SchedulerError};
pub use logging::{init_logging, LogFormat, LogMode};
pub use progress::{NestedProgressBar, ProgressBar, ProgressCounter, ProgressReporter};
pub use sequence::{
    batch_count, chunk, run_in_batches, run_in_sequence, FailurePolicy, RunMode, RunOptions,
    RunSummary,
};
pub use utils::{pad, wait};
