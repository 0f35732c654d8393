//! Retry logic with exponential backoff and jitter.
//!
//! The default policy matches the upstream connector retry schedule: up to 3
//! attempts, 1s -> 2s -> 4s backoff, +/-25% jitter, capped at 30s. A
//! `Retry-After` header on a `RateLimit` error overrides the computed delay.

use super::types::EngineError;
use super::ErrorCategory;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    /// Matches the connector retry schedule: 1s initial, doubling, 30s cap,
    /// 25% jitter, 3 attempts.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter_factor: 0.25,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: attempts,
            initial_delay: delay,
            max_delay: delay,
            multiplier: 1.0,
            jitter_factor: 0.0,
        }
    }

    pub fn exponential(attempts: u32) -> Self {
        Self { max_attempts: attempts, ..Default::default() }
    }

    /// Delay for the given attempt number (1-indexed). `attempt == 0` means
    /// "about to make the first try" and incurs no delay.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let mut delay = self.initial_delay.as_millis() as f64;

        if self.multiplier > 1.0 {
            delay *= self.multiplier.powi(attempt as i32 - 1);
        }

        delay = delay.min(self.max_delay.as_millis() as f64);

        if self.jitter_factor > 0.0 {
            let mut rng = rand::thread_rng();
            let jitter = rng.gen_range(-self.jitter_factor..=self.jitter_factor);
            delay *= 1.0 + jitter;
        }

        Duration::from_millis(delay.max(0.0) as u64)
    }

    pub fn should_retry(&self, error: &EngineError, attempt: u32) -> bool {
        attempt < self.max_attempts && error.retryable()
    }
}

/// Trait marking an error as retryable and categorizable, used by generic
/// retry-driving code outside this crate.
pub trait RetryableError {
    fn is_retryable(&self) -> bool;
    fn category(&self) -> ErrorCategory;
}

impl RetryableError for EngineError {
    fn is_retryable(&self) -> bool {
        self.retryable()
    }

    fn category(&self) -> ErrorCategory {
        match self {
            EngineError::RateLimit { .. }
            | EngineError::Server { .. }
            | EngineError::Network { .. }
            | EngineError::Timeout { .. }
            | EngineError::Database { .. } => ErrorCategory::Transient,

            EngineError::Auth { .. }
            | EngineError::NotFound { .. }
            | EngineError::Ssl { .. }
            | EngineError::Validation { .. }
            | EngineError::Decryption { .. }
            | EngineError::Configuration { .. } => ErrorCategory::Permanent,

            EngineError::NoResults { .. } => ErrorCategory::Business,

            EngineError::Serialization { .. } | EngineError::Deserialization { .. } | EngineError::Unknown { .. } => {
                ErrorCategory::System
            }
        }
    }
}

/// Retry an async operation with the given policy. A `RateLimit` error
/// carrying a `Retry-After` value overrides the computed backoff delay.
pub async fn retry_with_policy<F, Fut, T>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, EngineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EngineError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::info!(attempt, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) => {
                if !policy.should_retry(&error, attempt) {
                    tracing::error!(error = %error, attempt, "operation failed, no more retries");
                    return Err(error);
                }

                let delay = match &error {
                    EngineError::RateLimit { retry_after: Some(seconds), .. } => Duration::from_secs(*seconds),
                    _ => policy.calculate_delay(attempt + 1),
                };

                tracing::warn!(
                    error = %error,
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis(),
                    "operation failed, retrying"
                );

                attempt += 1;
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn delay_schedule_matches_connector_spec() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.calculate_delay(0), Duration::ZERO);

        let delay1 = policy.calculate_delay(1);
        assert!(delay1 >= Duration::from_millis(750));
        assert!(delay1 <= Duration::from_millis(1250));

        let delay2 = policy.calculate_delay(2);
        assert!(delay2 >= Duration::from_millis(1500));
        assert!(delay2 <= Duration::from_millis(2500));
    }

    #[test]
    fn fixed_policy_never_grows() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(500));
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(500));
        assert_eq!(policy.calculate_delay(3), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn retries_transient_until_success() {
        let attempt = Arc::new(AtomicU32::new(0));
        let attempt_clone = attempt.clone();

        let result = retry_with_policy(&RetryPolicy::fixed(3, Duration::from_millis(1)), move || {
            let attempt_clone = attempt_clone.clone();
            async move {
                let current = attempt_clone.fetch_add(1, Ordering::SeqCst) + 1;
                if current < 3 {
                    Err(EngineError::Network { connector: "sonarr".into(), cause: "reset".into() })
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempt.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_failures() {
        let attempt = Arc::new(AtomicU32::new(0));
        let attempt_clone = attempt.clone();

        let result: Result<(), EngineError> = retry_with_policy(&RetryPolicy::default(), move || {
            let attempt_clone = attempt_clone.clone();
            async move {
                attempt_clone.fetch_add(1, Ordering::SeqCst);
                Err(EngineError::Validation { message: "bad input".into() })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempt.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rate_limit_retry_after_overrides_backoff() {
        let attempt = Arc::new(AtomicU32::new(0));
        let attempt_clone = attempt.clone();
        let policy = RetryPolicy::fixed(2, Duration::from_millis(1));

        let result: Result<(), EngineError> = retry_with_policy(&policy, move || {
            let attempt_clone = attempt_clone.clone();
            async move {
                attempt_clone.fetch_add(1, Ordering::SeqCst);
                Err(EngineError::RateLimit { connector: "radarr".into(), retry_after: Some(0) })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempt.load(Ordering::SeqCst), 2);
    }
}
