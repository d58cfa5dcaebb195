// src/services/retry.rs

//! Bounded retry with a fixed delay between attempts.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, LocationId};

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Attempt ceiling and delay from the API settings.
    pub fn from_config(api: &ApiConfig) -> Self {
        Self::new(api.max_attempts, api.retry_delay())
    }

    /// Exactly one attempt.
    pub fn single() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ApiConfig::default())
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt ceiling is reached.
///
/// `op` receives the 1-based attempt number. Exhaustion is reported as
/// `AppError::RetriesExhausted` carrying the last error.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, location: LocationId, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                log::debug!(
                    "Location {}: attempt {}/{} failed [{}]: {}",
                    location,
                    attempt,
                    policy.max_attempts,
                    e.kind(),
                    e
                );
                if attempt >= policy.max_attempts {
                    return Err(AppError::RetriesExhausted {
                        location,
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
            }
        }

        if !policy.delay.is_zero() {
            tokio::time::sleep(policy.delay).await;
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_stops_at_ceiling() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry(fast(10), 5, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::transport(5, "connection refused")) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 10);
        assert!(matches!(
            result,
            Err(AppError::RetriesExhausted { attempts: 10, .. })
        ));
    }

    #[tokio::test]
    async fn test_recovers_after_failures() {
        let result = retry(fast(10), 5, |attempt| async move {
            if attempt < 3 {
                Err(AppError::protocol(5, 502, None))
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_malformed_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry(fast(10), 5, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::malformed(5, "no occasions")) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(AppError::MalformedRecord { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_between_attempts() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        let seen = std::sync::Mutex::new(Vec::new());

        let result: Result<()> = retry(policy, 5, |attempt| {
            seen.lock().unwrap().push((attempt, started.elapsed().as_secs()));
            async { Err(AppError::transport(5, "timed out")) }
        })
        .await;

        assert!(matches!(
            result,
            Err(AppError::RetriesExhausted { attempts: 3, .. })
        ));
        assert_eq!(started.elapsed().as_secs(), 4);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, 0), (2, 2), (3, 4)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_success() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        let started = tokio::time::Instant::now();

        let result = retry(policy, 5, |_| async { Ok(()) }).await;

        assert!(result.is_ok());
        assert_eq!(started.elapsed().as_secs(), 0);
    }

    #[test]
    fn test_policy_never_zero() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(RetryPolicy::default().max_attempts, 10);
        assert_eq!(RetryPolicy::default().delay, Duration::from_secs(2));
    }
}
