//! Fixed-delay retry policy
//!
//! One policy serves both the identity lookup and the enrichment fetch.
//! Attempts are strictly sequential; the first success — including an
//! operation that legitimately returns "nothing found" — ends the loop.
//! Exhausting every attempt returns the last error unchanged, so a
//! recoverable outage can never masquerade as a successful non-match.

use std::future::Future;
use std::time::Duration;

use crate::{Error, Result};

/// Retry configuration: total attempt cap and the fixed delay between
/// attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first (minimum 1).
    pub max_attempts: u32,
    /// Fixed wait between a retryable failure and the next attempt.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run `operation` under this policy.
    ///
    /// `is_retryable` decides which errors are worth another attempt; any
    /// other error returns immediately. After the final attempt the last
    /// error propagates to the caller.
    ///
    /// # Arguments
    /// * `operation_name` - Name for logging (e.g. "lookup", "enrich")
    /// * `is_retryable` - Predicate selecting errors that warrant a retry
    /// * `operation` - Async closure performing one attempt
    pub async fn run<F, Fut, T>(
        &self,
        operation_name: &str,
        is_retryable: impl Fn(&Error) -> bool,
        mut operation: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            if attempt > 1 {
                tracing::debug!(
                    operation = operation_name,
                    attempt,
                    "Retrying operation"
                );
            }

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        tracing::debug!(
                            operation = operation_name,
                            attempt,
                            "Operation succeeded after retry"
                        );
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if !is_retryable(&err) {
                        return Err(err);
                    }

                    if attempt >= self.max_attempts {
                        tracing::error!(
                            operation = operation_name,
                            attempt,
                            max_attempts = self.max_attempts,
                            error = %err,
                            "Operation failed: attempts exhausted"
                        );
                        return Err(err);
                    }

                    tracing::warn!(
                        operation = operation_name,
                        attempt,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %err,
                        "Operation failed, will retry after delay"
                    );

                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}
