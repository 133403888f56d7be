//! Bounded retry with a sleep between attempts

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How many times to try and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    attempts: u32,
    delay: Duration,
    factor: u32,
}

impl Backoff {
    /// Delay doubles after every failed attempt
    pub const fn exponential(attempts: u32, initial: Duration) -> Self {
        Self {
            attempts,
            delay: initial,
            factor: 2,
        }
    }

    pub const fn constant(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            delay,
            factor: 1,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run `attempt` until it succeeds or the attempts run out; the last error is returned
    pub async fn retry<T, E, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut delay = self.delay;
        let mut tried = 1;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) if tried >= self.attempts.max(1) => return Err(e),
                Err(e) => {
                    warn!(operation, attempt = tried, error = %e, "retrying in {:?}", delay);
                    tokio::time::sleep(delay).await;
                    delay *= self.factor;
                    tried += 1;
                }
            }
        }
    }
}
