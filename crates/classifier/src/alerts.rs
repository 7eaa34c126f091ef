use serde::{Deserialize, Serialize};

use crate::similarity::{round_to, SimilarityMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertHit {
    pub label: String,
    pub score: f32,
}

/// Alert concepts scoring strictly above `threshold`, highest first.
///
/// The comparison uses the raw score; the reported score is rounded to three decimals. Equal
/// scores keep catalog order.
pub fn detect_alerts(scores: &SimilarityMap, threshold: f32) -> Vec<AlertHit> {
    let mut hits: Vec<AlertHit> = scores
        .iter()
        .filter(|s| s.score > threshold)
        .map(|s| AlertHit {
            label: s.name.clone(),
            score: round_to(s.score, 3),
        })
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits
}
