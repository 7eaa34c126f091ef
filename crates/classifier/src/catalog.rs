//! Concept catalogs: named archetype phrases and their cached embeddings.
//!
//! A catalog is built once at startup by encoding every archetype through the embedding
//! provider, then never mutated. Iteration order is the order of the configuration list; every
//! tie-break downstream depends on it.

use std::collections::HashSet;
use std::time::Instant;

use semantic::{Embedding, EmbeddingProvider};
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// Configured catalog member before encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSpec {
    pub name: String,
    pub archetype: String,
}

impl ConceptSpec {
    pub fn new(name: impl Into<String>, archetype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            archetype: archetype.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConceptEntry {
    pub name: String,
    pub archetype_text: String,
    pub archetype_embedding: Embedding,
}

/// Immutable ordered table of encoded concepts.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptCatalog {
    label: String,
    entries: Vec<ConceptEntry>,
}

impl ConceptCatalog {
    /// Check names and archetypes without encoding anything.
    pub fn validate_specs(label: &str, specs: &[ConceptSpec]) -> Result<(), CatalogError> {
        if specs.is_empty() {
            return Err(CatalogError::Empty {
                catalog: label.to_string(),
            });
        }
        let mut seen = HashSet::with_capacity(specs.len());
        for spec in specs {
            if spec.name.trim().is_empty() {
                return Err(CatalogError::EmptyName {
                    catalog: label.to_string(),
                });
            }
            if spec.archetype.trim().is_empty() {
                return Err(CatalogError::EmptyArchetype {
                    catalog: label.to_string(),
                    name: spec.name.clone(),
                });
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(CatalogError::DuplicateName {
                    catalog: label.to_string(),
                    name: spec.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Encode every archetype exactly once, in order.
    pub async fn encode(
        label: &str,
        specs: &[ConceptSpec],
        provider: &dyn EmbeddingProvider,
    ) -> Result<Self, CatalogError> {
        Self::validate_specs(label, specs)?;
        let start = Instant::now();

        let texts: Vec<String> = specs.iter().map(|s| s.archetype.clone()).collect();
        let embeddings = provider
            .embed_batch(&texts)
            .await
            .map_err(|source| CatalogError::Encoding {
                catalog: label.to_string(),
                source,
            })?;

        if embeddings.len() != specs.len() {
            return Err(CatalogError::Encoding {
                catalog: label.to_string(),
                source: semantic::ProviderError::MalformedResponse(format!(
                    "{} embeddings for {} archetypes",
                    embeddings.len(),
                    specs.len()
                )),
            });
        }

        let entries = specs
            .iter()
            .zip(embeddings)
            .map(|(spec, embedding)| ConceptEntry {
                name: spec.name.clone(),
                archetype_text: spec.archetype.clone(),
                archetype_embedding: embedding,
            })
            .collect();

        let catalog = Self::from_entries(label, entries)?;
        tracing::info!(
            catalog = label,
            entries = catalog.len(),
            dim = catalog.dimension(),
            model = provider.model_name(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "catalog_encoded"
        );
        Ok(catalog)
    }

    /// Assemble a catalog from already-encoded entries.
    pub fn from_entries(label: &str, entries: Vec<ConceptEntry>) -> Result<Self, CatalogError> {
        let specs: Vec<ConceptSpec> = entries
            .iter()
            .map(|e| ConceptSpec::new(e.name.clone(), e.archetype_text.clone()))
            .collect();
        Self::validate_specs(label, &specs)?;

        let expected = entries[0].archetype_embedding.dim();
        for entry in &entries {
            let found = entry.archetype_embedding.dim();
            if found != expected || found == 0 {
                return Err(CatalogError::DimensionMismatch {
                    catalog: label.to_string(),
                    name: entry.name.clone(),
                    expected,
                    found,
                });
            }
        }

        Ok(Self {
            label: label.to_string(),
            entries,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entries(&self) -> &[ConceptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension shared by every entry.
    pub fn dimension(&self) -> usize {
        self.entries
            .first()
            .map(|e| e.archetype_embedding.dim())
            .unwrap_or(0)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ConceptEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Built-in department archetypes.
pub fn default_departments() -> Vec<ConceptSpec> {
    vec![
        ConceptSpec::new(
            "Engineering",
            "engineering technical design development systems software hardware architecture infrastructure",
        ),
        ConceptSpec::new(
            "HR",
            "human resources personnel recruitment employee benefits compensation training hiring",
        ),
        ConceptSpec::new(
            "Safety",
            "safety health protection hazards accidents incident workplace security emergency",
        ),
        ConceptSpec::new(
            "Regulatory",
            "regulatory compliance legal laws regulations policy standards requirements audit",
        ),
        ConceptSpec::new(
            "Compliance",
            "compliance adherence rules standards procedures guidelines protocols certification",
        ),
    ]
}

/// Built-in alert-concept archetypes.
pub fn default_alerts() -> Vec<ConceptSpec> {
    vec![
        ConceptSpec::new(
            "urgent operations",
            "urgent critical immediate action required priority",
        ),
        ConceptSpec::new(
            "safety hazards",
            "safety hazard danger risk injury harm workplace accident",
        ),
        ConceptSpec::new(
            "regulatory deadlines",
            "regulatory deadline compliance due date requirement submission",
        ),
        ConceptSpec::new(
            "risk & failure",
            "risk failure problem issue concern threat vulnerability",
        ),
        ConceptSpec::new(
            "safety non-compliance",
            "safety violation non-compliance breach infraction deviation",
        ),
    ]
}
