use classifier::{AlertHit, SimilarityMap};
use serde::{Deserialize, Serialize};

use crate::sections::SectionScore;
use crate::summary::SummarySource;

/// Everything the engine decided about one document.
///
/// Built once per run and never modified afterwards. `confidence` is always
/// `all_scores[predicted_department]`, except for unscorable documents where `all_scores` is
/// empty and `confidence` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub predicted_department: String,
    pub confidence: f32,
    pub all_scores: SimilarityMap,
    pub alerts: Vec<AlertHit>,
    pub is_misfiled: bool,
    /// Empty unless `is_misfiled`.
    pub flag_reason: String,
    pub summary: String,
    pub summary_source: SummarySource,
    pub detected_language: String,
    /// Truncated for storage; empty when no translation was needed.
    pub translated_text: String,
    /// Truncated for storage.
    pub original_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionScore>,
    #[serde(default, skip_serializing_if = "SimilarityMap::is_empty")]
    pub section_aggregate: SimilarityMap,
}

impl ProcessingResult {
    pub fn is_unscorable(&self) -> bool {
        self.summary_source == SummarySource::Unscorable
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}
