//! Model providers for the docintel engine.
//!
//! Three capabilities live here, each behind an async trait so the engine never cares which
//! backend is wired in:
//!
//! - [`EmbeddingProvider`] turns text into a dense vector ([`Embedding`]).
//! - [`Summarizer`] produces an abstractive summary.
//! - [`Translator`] translates arbitrary text into English.
//!
//! Backends:
//!
//! - **API mode** calls a remote inference endpoint (Hugging Face, OpenAI-compatible, or a custom
//!   JSON service). Every endpoint owns its own circuit breaker, token bucket, and retry policy.
//! - **Stub mode** ([`StubEmbedder`]) is deterministic and offline. Good for tests and demos.
//! - **Disabled** summarizer/translator always fail, which selects the caller's fallback path.
//!
//! Providers never panic: every failure comes back as a [`ProviderError`].
//!
//! ## Quick example
//!
//! ```
//! use semantic::{embedder_from_config, SemanticConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let cfg = SemanticConfig {
//!     mode: "stub".into(),
//!     stub_dimension: 64,
//!     ..Default::default()
//! };
//! let embedder = embedder_from_config(&cfg).unwrap();
//! let a = embedder.embed("pressure vessel inspection").await.unwrap();
//! let b = embedder.embed("pressure vessel inspection").await.unwrap();
//! assert_eq!(a, b);
//! assert!((a.cosine_similarity(&b) - 1.0).abs() < 1e-6);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod resilience;
pub mod types;

mod api;
mod generate;
mod normalize;
mod provider;
mod serde_millis;
mod stub;

use std::sync::Arc;

pub use crate::api::ApiEmbedder;
pub use crate::config::{EndpointConfig, SemanticConfig, SummarizerConfig, TranslatorConfig};
pub use crate::error::ProviderError;
pub use crate::generate::{
    ApiSummarizer, ApiTranslator, LazyTranslator, UnavailableSummarizer, UnavailableTranslator,
};
pub use crate::provider::{EmbeddingProvider, Summarizer, Translator};
pub use crate::stub::StubEmbedder;
pub use crate::types::{cosine_similarity, Embedding};

/// Build the embedding provider selected by `cfg.mode`.
pub fn embedder_from_config(
    cfg: &SemanticConfig,
) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
    cfg.validate().map_err(ProviderError::InvalidConfig)?;
    match cfg.mode.as_str() {
        "stub" => Ok(Arc::new(StubEmbedder::from_config(cfg))),
        _ => Ok(Arc::new(ApiEmbedder::new(cfg)?)),
    }
}

/// Build the summarizer selected by `cfg.mode`.
pub fn summarizer_from_config(cfg: &SummarizerConfig) -> Result<Arc<dyn Summarizer>, ProviderError> {
    cfg.validate().map_err(ProviderError::InvalidConfig)?;
    match cfg.mode.as_str() {
        "disabled" => Ok(Arc::new(UnavailableSummarizer)),
        _ => Ok(Arc::new(ApiSummarizer::new(cfg)?)),
    }
}

/// Build the translator selected by `cfg.mode`.
///
/// Wrap the result in [`LazyTranslator`] instead when construction should wait for the first
/// non-English document.
pub fn translator_from_config(cfg: &TranslatorConfig) -> Result<Arc<dyn Translator>, ProviderError> {
    cfg.validate().map_err(ProviderError::InvalidConfig)?;
    match cfg.mode.as_str() {
        "disabled" => Ok(Arc::new(UnavailableTranslator)),
        _ => Ok(Arc::new(ApiTranslator::new(cfg)?)),
    }
}
