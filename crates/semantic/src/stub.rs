use async_trait::async_trait;
use fxhash::hash64;

use crate::normalize::l2_normalize_in_place;
use crate::{Embedding, EmbeddingProvider, ProviderError, SemanticConfig};

/// Deterministic offline embedder.
///
/// Each lower-cased alphanumeric token is hashed into one of `dim` buckets with a hash-derived
/// sign, so texts sharing vocabulary land close together. Text without any token falls back to
/// a sinusoid seeded by the hash of the whole input. No network, no model files.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
    normalize: bool,
    model_name: String,
}

impl StubEmbedder {
    pub fn new(dim: usize, normalize: bool, model_name: impl Into<String>) -> Self {
        Self {
            dim: dim.max(1),
            normalize,
            model_name: model_name.into(),
        }
    }

    pub fn from_config(cfg: &SemanticConfig) -> Self {
        Self::new(cfg.stub_dimension, cfg.normalize, cfg.model_name.clone())
    }

    /// Synchronous core of [`EmbeddingProvider::embed`].
    pub fn embed_now(&self, text: &str) -> Embedding {
        let mut v = vec![0f32; self.dim];
        let mut tokens = 0usize;

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let h = hash64(token.to_lowercase().as_bytes());
            let bucket = (h % self.dim as u64) as usize;
            let sign = if (h >> 63) & 1 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
            tokens += 1;
        }

        if tokens == 0 {
            let h = hash64(text.as_bytes());
            for (idx, value) in v.iter_mut().enumerate() {
                *value = ((h >> (idx % 32)) as f32 * 0.0001).sin();
            }
        }

        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        Embedding::new(v, self.model_name.clone(), self.normalize)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError> {
        Ok(self.embed_now(text))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(normalize: bool) -> StubEmbedder {
        StubEmbedder::new(384, normalize, "stub-test")
    }

    #[test]
    fn stub_embedding_has_configured_dimension() {
        let e = stub(false).embed_now("hello world");
        assert_eq!(e.dim(), 384);
        assert_eq!(e.model_name, "stub-test");
        assert!(!e.normalized);
    }

    #[test]
    fn stub_embedding_deterministic() {
        let s = stub(true);
        assert_eq!(s.embed_now("same text").vector, s.embed_now("same text").vector);
    }

    #[test]
    fn stub_embedding_different_text() {
        let s = stub(false);
        assert_ne!(s.embed_now("hello").vector, s.embed_now("world").vector);
    }

    #[test]
    fn stub_embedding_is_case_insensitive_per_token() {
        let s = stub(true);
        assert_eq!(
            s.embed_now("Safety Hazard").vector,
            s.embed_now("safety hazard").vector
        );
    }

    #[test]
    fn shared_vocabulary_scores_higher() {
        let s = stub(true);
        let query = s.embed_now("fire hazard in the warehouse");
        let close = s.embed_now("fire hazard reported");
        let far = s.embed_now("quarterly payroll schedule");
        assert!(query.cosine_similarity(&close) > query.cosine_similarity(&far));
    }

    #[test]
    fn stub_embedding_normalized() {
        let e = stub(true).embed_now("test");
        assert!(e.normalized);
        let norm: f32 = e.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "got norm={norm}");
    }

    #[test]
    fn punctuation_only_text_still_produces_signal() {
        let e = stub(false).embed_now("!@#$%^&*()");
        assert!(!e.vector.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn zero_dimension_is_clamped() {
        let e = StubEmbedder::new(0, false, "m").embed_now("abc");
        assert_eq!(e.dim(), 1);
    }

    #[tokio::test]
    async fn trait_embed_matches_sync_core() {
        let s = stub(true);
        let via_trait = s.embed("unicode 世界").await.unwrap();
        assert_eq!(via_trait, s.embed_now("unicode 世界"));

        let batch = s
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], s.embed_now("b"));
    }
}
