use std::time::Instant;

use semantic::{Embedding, EmbeddingProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alerts::{detect_alerts, AlertHit};
use crate::department::{classify_scores, ClassificationResult};
use crate::misfile::{MisfileVerdict, MisfilingPolicy};
use crate::similarity::{score_against, SimilarityMap};
use crate::{CatalogError, ClassifierConfig, ConceptCatalog};

/// Department and alert scores for one embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentScores {
    pub classification: ClassificationResult,
    pub alerts: Vec<AlertHit>,
}

/// Both catalogs plus the thresholds that turn similarity into decisions.
///
/// Read-only after construction; share it behind an `Arc` across concurrent documents.
#[derive(Debug, Clone)]
pub struct Classifier {
    departments: ConceptCatalog,
    alerts: ConceptCatalog,
    alert_threshold: f32,
    policy: MisfilingPolicy,
}

impl Classifier {
    /// Validate `cfg` and encode both catalogs through `provider`.
    pub async fn build(
        cfg: &ClassifierConfig,
        provider: &dyn EmbeddingProvider,
    ) -> Result<Self, CatalogError> {
        cfg.validate()?;
        let departments = ConceptCatalog::encode("department", &cfg.departments, provider).await?;
        let alerts = ConceptCatalog::encode("alert", &cfg.alerts, provider).await?;
        Self::from_catalogs(departments, alerts, cfg.alert_threshold, cfg.misfile_threshold)
    }

    pub fn from_catalogs(
        departments: ConceptCatalog,
        alerts: ConceptCatalog,
        alert_threshold: f32,
        misfile_threshold: f32,
    ) -> Result<Self, CatalogError> {
        if departments.dimension() != alerts.dimension() {
            let name = alerts.names().next().unwrap_or_default().to_string();
            return Err(CatalogError::DimensionMismatch {
                catalog: alerts.label().to_string(),
                name,
                expected: departments.dimension(),
                found: alerts.dimension(),
            });
        }
        Ok(Self {
            departments,
            alerts,
            alert_threshold,
            policy: MisfilingPolicy::new(misfile_threshold),
        })
    }

    pub fn departments(&self) -> &ConceptCatalog {
        &self.departments
    }

    pub fn alerts(&self) -> &ConceptCatalog {
        &self.alerts
    }

    pub fn alert_threshold(&self) -> f32 {
        self.alert_threshold
    }

    pub fn policy(&self) -> MisfilingPolicy {
        self.policy
    }

    /// Embedding dimension both catalogs were encoded with.
    pub fn dimension(&self) -> usize {
        self.departments.dimension()
    }

    pub fn department_scores(&self, embedding: &Embedding) -> SimilarityMap {
        score_against(embedding, &self.departments)
    }

    pub fn alert_scores(&self, embedding: &Embedding) -> SimilarityMap {
        score_against(embedding, &self.alerts)
    }

    pub fn classify(&self, embedding: &Embedding) -> ClassificationResult {
        let scores = self.department_scores(embedding);
        // The department catalog is never empty, so this always yields a prediction.
        classify_scores(&scores).unwrap_or_else(|| ClassificationResult::unscored(""))
    }

    pub fn detect_alerts(&self, embedding: &Embedding) -> Vec<AlertHit> {
        detect_alerts(&self.alert_scores(embedding), self.alert_threshold)
    }

    /// Classify and detect alerts in one pass.
    pub fn score(&self, embedding: &Embedding) -> DocumentScores {
        let start = Instant::now();
        let classification = self.classify(embedding);
        let alerts = self.detect_alerts(embedding);
        debug!(
            predicted = %classification.predicted_department,
            confidence = classification.confidence,
            alerts = alerts.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "classify_success"
        );
        DocumentScores {
            classification,
            alerts,
        }
    }

    pub fn misfile(&self, declared: &str, result: &ClassificationResult) -> MisfileVerdict {
        self.policy.evaluate(declared, result)
    }
}
