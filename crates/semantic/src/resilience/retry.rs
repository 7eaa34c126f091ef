//! Retry logic with exponential backoff for transient provider failures.

use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Base delay between retries (exponentially increased), in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub base_delay: Duration,
    /// Maximum delay between retries, in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub max_delay: Duration,
    /// Whether to add random jitter to delays.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Outcome of a retried operation.
#[derive(Debug, Clone)]
pub struct RetryResult<T, E> {
    /// The final result (Ok if succeeded, Err carrying the last error otherwise).
    pub result: Result<T, E>,
    /// Number of attempts made (1 = no retries needed).
    pub attempts: u32,
    /// Total duration spent on all attempts.
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Execute an async operation, retrying while `should_retry` accepts the error.
///
/// `operation` receives the zero-based attempt number.
pub async fn execute_with_retry_async<T, E, F, Fut, R>(
    config: &RetryConfig,
    mut operation: F,
    should_retry: R,
) -> RetryResult<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let start = Instant::now();
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return RetryResult {
                    result: Ok(value),
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                };
            }
            Err(error) => {
                if attempt >= config.max_retries || !should_retry(&error) {
                    return RetryResult {
                        result: Err(error),
                        attempts: attempt + 1,
                        total_duration: start.elapsed(),
                    };
                }
                tokio::time::sleep(calculate_delay(config, attempt)).await;
                attempt += 1;
            }
        }
    }
}

/// Calculate delay for a retry attempt with exponential backoff.
fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.base_delay.as_millis() as u64;
    let exponential = base.saturating_mul(2_u64.saturating_pow(attempt));
    let delay = exponential.min(config.max_delay.as_millis() as u64);

    if config.jitter {
        // Add 0-50% random jitter
        let jitter = fastrand::u64(0..=delay / 2);
        Duration::from_millis(delay + jitter)
    } else {
        Duration::from_millis(delay)
    }
}

/// Check if an error message describes a transient failure.
pub fn is_retryable_error(error: &str) -> bool {
    let error_lower = error.to_lowercase();

    if error_lower.contains("timeout")
        || error_lower.contains("timed out")
        || error_lower.contains("connection")
        || error_lower.contains("reset")
        || error_lower.contains("temporarily")
        || error_lower.contains("unavailable")
        || error_lower.contains("503")
        || error_lower.contains("502")
        || error_lower.contains("429")
        || error_lower.contains("504")
        || error_lower.contains("408")
    {
        return true;
    }

    if error_lower.contains("401")
        || error_lower.contains("403")
        || error_lower.contains("404")
        || error_lower.contains("400")
        || error_lower.contains("invalid")
        || error_lower.contains("not found")
    {
        return false;
    }

    // Default to retryable for unknown errors
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig::default()
            .with_max_retries(max_retries)
            .with_base_delay(Duration::from_millis(1))
            .with_jitter(false)
    }

    #[tokio::test]
    async fn retry_succeeds_eventually() {
        let counter = AtomicU32::new(0);
        let result = execute_with_retry_async(
            &fast_config(3),
            |_attempt| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err("timeout".to_string())
                    } else {
                        Ok("success")
                    }
                }
            },
            |e: &String| is_retryable_error(e),
        )
        .await;

        assert!(result.succeeded());
        assert_eq!(result.attempts, 3);
        assert_eq!(result.into_result().unwrap(), "success");
    }

    #[tokio::test]
    async fn retry_fails_after_max_attempts() {
        let result: RetryResult<(), String> = execute_with_retry_async(
            &fast_config(2),
            |_attempt| async { Err("connection refused".to_string()) },
            |e: &String| is_retryable_error(e),
        )
        .await;

        assert!(!result.succeeded());
        assert_eq!(result.attempts, 3); // Initial + 2 retries
    }

    #[tokio::test]
    async fn non_retryable_error_stops_immediately() {
        let result: RetryResult<(), String> = execute_with_retry_async(
            &fast_config(5),
            |_attempt| async { Err("HTTP error 401 Unauthorized".to_string()) },
            |e: &String| is_retryable_error(e),
        )
        .await;

        assert_eq!(result.attempts, 1);
        assert!(result.into_result().unwrap_err().contains("401"));
    }

    #[test]
    fn delay_is_capped() {
        let cfg = RetryConfig::default()
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(250))
            .with_jitter(false);
        assert_eq!(calculate_delay(&cfg, 0), Duration::from_millis(100));
        assert_eq!(calculate_delay(&cfg, 1), Duration::from_millis(200));
        assert_eq!(calculate_delay(&cfg, 5), Duration::from_millis(250));
    }

    #[test]
    fn is_retryable_error_detection() {
        assert!(is_retryable_error("timeout"));
        assert!(is_retryable_error("connection reset"));
        assert!(is_retryable_error("HTTP 503"));
        assert!(is_retryable_error("HTTP 429"));
        assert!(is_retryable_error("service temporarily unavailable"));

        assert!(!is_retryable_error("HTTP 400"));
        assert!(!is_retryable_error("HTTP 401"));
        assert!(!is_retryable_error("HTTP 404"));
        assert!(!is_retryable_error("invalid api key"));
    }

    #[test]
    fn retry_config_serializes_millis() {
        let cfg = RetryConfig::default();
        let json = serde_json::to_value(cfg).unwrap();
        assert_eq!(json["base_delay"], 100);
        assert_eq!(json["max_delay"], 10_000);
    }
}
