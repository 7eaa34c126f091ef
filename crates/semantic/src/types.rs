use serde::{Deserialize, Serialize};

/// Dense vector produced by an embedding provider.
///
/// The engine treats the vector as opaque apart from [`Embedding::cosine_similarity`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    /// Final embedding values.
    pub vector: Vec<f32>,
    /// Name of the model used to produce the vector.
    pub model_name: String,
    /// Whether [`vector`](Self::vector) was L2-normalized.
    pub normalized: bool,
}

impl Embedding {
    pub fn new(vector: Vec<f32>, model_name: impl Into<String>, normalized: bool) -> Self {
        Self {
            vector,
            model_name: model_name.into(),
            normalized,
        }
    }

    /// All-zero vector of the given dimension. Scores 0.0 against everything.
    pub fn zeros(dim: usize, model_name: impl Into<String>) -> Self {
        Self::new(vec![0.0; dim], model_name, false)
    }

    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    /// Cosine similarity in `[-1, 1]`.
    ///
    /// Returns `0.0` when either vector has zero norm or the dimensions differ, so a degenerate
    /// embedding never produces NaN.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        cosine_similarity(&self.vector, &other.vector)
    }
}

/// Cosine similarity over raw slices, accumulated in `f64` for stable results.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if score.is_finite() {
        score.clamp(-1.0, 1.0) as f32
    } else {
        0.0
    }
}
