use serde::{Deserialize, Serialize};

use crate::department::ClassificationResult;
use crate::similarity::format_percent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MisfileVerdict {
    pub is_misfiled: bool,
    /// Empty unless `is_misfiled`.
    pub reason: String,
}

impl MisfileVerdict {
    pub fn filed_correctly() -> Self {
        Self {
            is_misfiled: false,
            reason: String::new(),
        }
    }
}

/// Flags a document only when the classifier confidently disagrees with the declared
/// department: `declared != predicted && confidence > threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MisfilingPolicy {
    pub threshold: f32,
}

impl MisfilingPolicy {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn evaluate(&self, declared: &str, result: &ClassificationResult) -> MisfileVerdict {
        let disagrees = declared != result.predicted_department;
        if !(disagrees && result.confidence > self.threshold) {
            return MisfileVerdict::filed_correctly();
        }

        MisfileVerdict {
            is_misfiled: true,
            reason: format!(
                "Document semantically matches \"{}\" with {} confidence, but filed under \"{}\"",
                result.predicted_department,
                format_percent(result.confidence),
                declared
            ),
        }
    }
}
