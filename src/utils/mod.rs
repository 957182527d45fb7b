//! Small helpers used alongside the runners in scraping scripts.

pub mod format;
pub mod serde;
pub mod timing;

pub use format::pad;
pub use timing::{jittered, wait};
