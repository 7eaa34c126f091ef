//! Provider resilience: circuit breaker, rate limiting, and retry with backoff.
//!
//! Every HTTP-backed provider owns one breaker and one bucket, so a failing summarizer never
//! trips the embedding endpoint.

mod circuit_breaker;
mod rate_limit;
mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use rate_limit::{presets, RateLimitConfig, RateLimitStats, TokenBucket};
pub use retry::{execute_with_retry_async, is_retryable_error, RetryConfig, RetryResult};
