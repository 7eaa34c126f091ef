use async_trait::async_trait;

use crate::{Embedding, ProviderError};

/// Maps text to a fixed-dimension vector.
///
/// Implementations must be deterministic for a fixed model: equal inputs give equal vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError>;

    /// Embed several texts, preserving input order.
    ///
    /// The default issues one [`embed`](Self::embed) call per text; HTTP providers override it
    /// with a single batched request.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, ProviderError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Label attached to every produced [`Embedding`].
    fn model_name(&self) -> &str;
}

/// Abstractive summarization.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text`; `min_length`/`max_length` are model-token bounds passed through to the
    /// provider.
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, ProviderError>;
}

/// Translation of arbitrary text into English.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, ProviderError>;
}
