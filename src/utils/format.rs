//! String formatting helpers for numbered output (file names, page indexes).

use std::fmt::Display;

/// Left-pad the display form of `value` with zeroes to at least `width`
/// characters. Values already that long come back unchanged.
///
/// ```rust
/// use salticidae::utils::pad;
///
/// assert_eq!(pad(7, 3), "007");
/// assert_eq!(pad("0007", 3), "0007");
/// ```
pub fn pad(value: impl Display, width: usize) -> String {
    format!("{value:0>width$}")
}
