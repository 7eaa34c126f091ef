//! Token-bucket rate limiting for provider endpoints.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Configuration for rate limiting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Maximum requests per second (sustained rate).
    pub requests_per_second: f64,
    /// Burst capacity (maximum requests that can be made instantly).
    pub burst_size: u64,
    /// Maximum wait time for a token in milliseconds (0 = fail immediately if no token available).
    #[serde(with = "crate::serde_millis")]
    pub max_wait: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10.0,
            burst_size: 20,
            max_wait: Duration::from_secs(5),
        }
    }
}

impl RateLimitConfig {
    pub fn with_requests_per_second(mut self, rps: f64) -> Self {
        self.requests_per_second = rps;
        self
    }

    pub fn with_burst_size(mut self, burst: u64) -> Self {
        self.burst_size = burst;
        self
    }

    pub fn with_max_wait(mut self, wait: Duration) -> Self {
        self.max_wait = wait;
        self
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_update: Instant,
}

/// Token bucket rate limiter.
#[derive(Debug)]
pub struct TokenBucket {
    config: RateLimitConfig,
    bucket: Mutex<Bucket>,
    total_requests: AtomicU64,
    total_waited: AtomicU64,
    total_rejected: AtomicU64,
}

impl TokenBucket {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            bucket: Mutex::new(Bucket {
                tokens: config.burst_size as f64,
                last_update: Instant::now(),
            }),
            total_requests: AtomicU64::new(0),
            total_waited: AtomicU64::new(0),
            total_rejected: AtomicU64::new(0),
        }
    }

    fn refilled(&self) -> MutexGuard<'_, Bucket> {
        let mut bucket = self
            .bucket
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_update).as_secs_f64();
        bucket.last_update = now;
        bucket.tokens =
            (bucket.tokens + elapsed * self.config.requests_per_second).min(self.config.burst_size as f64);
        bucket
    }

    /// Take a token if one is available right now; `Err` carries the wait until the next one.
    fn take(&self) -> Result<(), Duration> {
        let mut bucket = self.refilled();
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else if self.config.requests_per_second <= 0.0 {
            Err(self.config.max_wait)
        } else {
            let wait = (1.0 - bucket.tokens) / self.config.requests_per_second;
            Err(Duration::from_secs_f64(wait.min(0.1)))
        }
    }

    /// Try to acquire a token without waiting.
    pub fn try_acquire(&self) -> bool {
        self.total_requests.fetch_add(1, Ordering::SeqCst);
        match self.take() {
            Ok(()) => true,
            Err(_) => {
                self.total_rejected.fetch_add(1, Ordering::SeqCst);
                false
            }
        }
    }

    /// Acquire a token, waiting up to `max_wait`. Returns `false` on timeout.
    pub async fn acquire(&self) -> bool {
        self.total_requests.fetch_add(1, Ordering::SeqCst);
        let start = Instant::now();
        let mut waited = false;

        loop {
            match self.take() {
                Ok(()) => {
                    if waited {
                        self.total_waited.fetch_add(1, Ordering::SeqCst);
                    }
                    return true;
                }
                Err(wait) => {
                    let elapsed = start.elapsed();
                    if elapsed >= self.config.max_wait {
                        self.total_rejected.fetch_add(1, Ordering::SeqCst);
                        return false;
                    }
                    waited = true;
                    tokio::time::sleep(wait.min(self.config.max_wait - elapsed)).await;
                }
            }
        }
    }

    pub fn stats(&self) -> RateLimitStats {
        RateLimitStats {
            available_tokens: self.refilled().tokens,
            total_requests: self.total_requests.load(Ordering::SeqCst),
            total_waited: self.total_waited.load(Ordering::SeqCst),
            total_rejected: self.total_rejected.load(Ordering::SeqCst),
        }
    }
}

/// Statistics for rate limiter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitStats {
    pub available_tokens: f64,
    pub total_requests: u64,
    pub total_waited: u64,
    pub total_rejected: u64,
}

impl RateLimitStats {
    /// Calculate rejection rate (0.0 to 1.0).
    pub fn rejection_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_rejected as f64 / self.total_requests as f64
        }
    }
}

/// Common rate limit configs for popular providers.
pub mod presets {
    use super::*;

    /// HuggingFace Inference API (free tier).
    pub fn huggingface_free() -> RateLimitConfig {
        RateLimitConfig {
            requests_per_second: 1.0,
            burst_size: 3,
            max_wait: Duration::from_secs(10),
        }
    }

    /// HuggingFace Inference API (pro tier).
    pub fn huggingface_pro() -> RateLimitConfig {
        RateLimitConfig {
            requests_per_second: 10.0,
            burst_size: 30,
            max_wait: Duration::from_secs(30),
        }
    }

    /// Self-hosted inference server.
    pub fn local_api() -> RateLimitConfig {
        RateLimitConfig {
            requests_per_second: 100.0,
            burst_size: 200,
            max_wait: Duration::from_secs(1),
        }
    }
}
