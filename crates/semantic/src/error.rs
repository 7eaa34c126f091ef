use thiserror::Error;

/// Errors surfaced by every provider call (embedding, summarization, translation).
///
/// Providers never panic and never retry past their own resilience policy; the caller decides
/// which fallback applies to each variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Configuration is inconsistent (e.g., `api` mode without an `api_url`).
    #[error("invalid provider config: {0}")]
    InvalidConfig(String),
    /// Transport-level failure or a non-success HTTP status.
    #[error("http failure: {0}")]
    Http(String),
    /// The provider answered, but not with anything usable.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    /// The circuit breaker for this provider is open.
    #[error("circuit breaker open for provider '{0}'")]
    CircuitOpen(String),
    /// No rate-limit token became available within the configured wait.
    #[error("rate limit exceeded for provider '{0}'")]
    RateLimited(String),
    /// The provider is switched off in configuration.
    #[error("provider disabled: {0}")]
    Disabled(String),
}

impl ProviderError {
    /// Whether this failure was produced locally without contacting the provider.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ProviderError::InvalidConfig(_)
                | ProviderError::CircuitOpen(_)
                | ProviderError::RateLimited(_)
                | ProviderError::Disabled(_)
        )
    }
}
