//! Bounded retry for remote queries.

use std::fmt::Display;
use std::thread;
use std::time::Duration;

/// Default number of attempts per query (no retry beyond the first try).
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 1;

/// Default pause between two attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// How many times a query is attempted before its error is surfaced.
///
/// Read-only after construction, so one policy can be shared by
/// concurrent callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. At least one attempt is always made.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        RetryPolicy {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Total number of attempts.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Pause between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `f` until it succeeds or the attempt budget is spent.
    ///
    /// The error of the last attempt is returned.
    pub fn run<T, E, F>(&self, operation: &str, mut f: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match f() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.attempts => {
                    tracing::warn!(
                        "Query to {} failed (attempt {}/{}): {}",
                        operation,
                        attempt,
                        self.attempts,
                        e
                    );
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}
