use serde::{Deserialize, Serialize};

use crate::catalog::{default_alerts, default_departments, ConceptCatalog, ConceptSpec};
use crate::CatalogError;

/// Thresholds and catalog definitions for the classification stage.
///
/// ```rust
/// use classifier::ClassifierConfig;
///
/// let cfg = ClassifierConfig::default();
/// assert_eq!(cfg.departments.len(), 5);
/// assert_eq!(cfg.alert_threshold, 0.50);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Alert concepts must score strictly above this.
    pub alert_threshold: f32,
    /// Disagreement is flagged only when confidence is strictly above this.
    pub misfile_threshold: f32,
    pub departments: Vec<ConceptSpec>,
    pub alerts: Vec<ConceptSpec>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            alert_threshold: 0.50,
            misfile_threshold: 0.60,
            departments: default_departments(),
            alerts: default_alerts(),
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (field, value) in [
            ("alert_threshold", self.alert_threshold),
            ("misfile_threshold", self.misfile_threshold),
        ] {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(CatalogError::InvalidConfig(format!(
                    "classifier.{field} must lie in [-1, 1], got {value}"
                )));
            }
        }
        ConceptCatalog::validate_specs("department", &self.departments)?;
        ConceptCatalog::validate_specs("alert", &self.alerts)?;
        Ok(())
    }
}
