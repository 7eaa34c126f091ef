use serde::{Deserialize, Serialize};

use crate::similarity::SimilarityMap;

/// Best-matching department for one document.
///
/// `all_scores` is rounded to three decimals and `confidence` is read from it, so
/// `confidence == all_scores[predicted_department]` holds exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub predicted_department: String,
    pub confidence: f32,
    pub all_scores: SimilarityMap,
}

impl ClassificationResult {
    /// Result for a document that was never scored: the declared department, zero confidence,
    /// no scores.
    pub fn unscored(declared_department: &str) -> Self {
        Self {
            predicted_department: declared_department.to_string(),
            confidence: 0.0,
            all_scores: SimilarityMap::default(),
        }
    }
}

/// Pick the argmax of `scores` after rounding to three decimals.
///
/// Exact ties go to the entry that comes first in catalog order. Returns `None` only for an
/// empty map.
pub fn classify_scores(scores: &SimilarityMap) -> Option<ClassificationResult> {
    let rounded = scores.rounded(3);

    let mut best: Option<(&str, f32)> = None;
    for s in rounded.iter() {
        match best {
            Some((_, top)) if s.score <= top => {}
            _ => best = Some((s.name.as_str(), s.score)),
        }
    }

    let (name, confidence) = best?;
    let predicted_department = name.to_string();
    Some(ClassificationResult {
        predicted_department,
        confidence,
        all_scores: rounded,
    })
}
