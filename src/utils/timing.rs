//! Jittered delays for spacing out requests.

use std::time::Duration;

use crate::constants::WAIT_JITTER_FACTOR;

/// `delay` scaled by a uniform factor in `[0.8, 1.2)`
pub fn jittered(delay: Duration) -> Duration {
    let factor = 1.0 - WAIT_JITTER_FACTOR + fastrand::f64() * (2.0 * WAIT_JITTER_FACTOR);
    delay.mul_f64(factor)
}

/// Sleep for roughly `delay` (±20%), then hand `value` back.
///
/// Meant to sit between tasks that hit the same remote host:
///
/// ```rust
/// # async fn example() {
/// use std::time::Duration;
/// use salticidae::utils::wait;
///
/// let page = wait(Duration::from_millis(5), "page-1").await;
/// assert_eq!(page, "page-1");
/// # }
/// ```
pub async fn wait<T>(delay: Duration, value: T) -> T {
    tokio::time::sleep(jittered(delay)).await;
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_jitter_stays_within_bounds() {
        let base = Duration::from_millis(1000);
        for _ in 0..200 {
            let delay = jittered(base);
            assert!(delay >= Duration::from_millis(800), "{delay:?} too short");
            assert!(delay < Duration::from_millis(1200), "{delay:?} too long");
        }
    }

    #[test]
    fn test_zero_delay_stays_zero() {
        assert_eq!(jittered(Duration::ZERO), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_wait_returns_value_after_delay() {
        let start = Instant::now();
        let value = wait(Duration::from_millis(20), "Some Value").await;
        assert_eq!(value, "Some Value");
        assert!(start.elapsed() >= Duration::from_millis(16));
    }
}
