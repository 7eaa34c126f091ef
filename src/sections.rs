//! Per-paragraph scoring, reported next to the whole-document result.

use classifier::{AlertHit, Classifier, ConceptScore, SimilarityMap};
use language::char_prefix;
use semantic::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Mean,
    Max,
    /// Mean weighted by paragraph length in characters.
    Weighted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub enabled: bool,
    pub min_paragraph_chars: usize,
    pub max_paragraphs: usize,
    pub snippet_chars: usize,
    pub aggregation: Aggregation,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_paragraph_chars: 40,
            max_paragraphs: 20,
            snippet_chars: 160,
            aggregation: Aggregation::Mean,
        }
    }
}

impl SectionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_paragraphs == 0 {
            return Err("pipeline.sections.max_paragraphs must be >= 1".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    /// Position among all paragraphs of the text, counting skipped ones.
    pub paragraph_index: usize,
    pub snippet: String,
    pub department_scores: SimilarityMap,
    pub alerts: Vec<AlertHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnalysis {
    pub sections: Vec<SectionScore>,
    /// Paragraph department scores folded per department; empty when no paragraph was scored.
    pub aggregate: SimilarityMap,
}

/// Split on blank lines; paragraphs are trimmed and never empty.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                out.push(text[s..end].trim());
            }
        } else {
            start.get_or_insert(offset);
            end = offset + line.len();
        }
        offset += line.len();
    }
    if let Some(s) = start {
        out.push(text[s..end].trim());
    }
    out
}

pub async fn analyze_sections(
    cfg: &SectionConfig,
    text: &str,
    provider: &dyn EmbeddingProvider,
    classifier: &Classifier,
) -> SectionAnalysis {
    let mut sections = Vec::new();
    let mut weights = Vec::new();

    let candidates = split_paragraphs(text)
        .into_iter()
        .enumerate()
        .filter(|(_, p)| p.chars().count() >= cfg.min_paragraph_chars)
        .take(cfg.max_paragraphs);

    for (paragraph_index, paragraph) in candidates {
        let embedding = match provider.embed(paragraph).await {
            Ok(e) => e,
            Err(err) => {
                warn!(paragraph_index, error = %err, "section_embed_failed");
                continue;
            }
        };
        weights.push(paragraph.chars().count() as f64);
        sections.push(SectionScore {
            paragraph_index,
            snippet: char_prefix(paragraph, cfg.snippet_chars).to_string(),
            department_scores: classifier.department_scores(&embedding).rounded(3),
            alerts: classifier.detect_alerts(&embedding),
        });
    }

    let aggregate = aggregate(&sections, &weights, cfg.aggregation);
    SectionAnalysis {
        sections,
        aggregate,
    }
}

fn aggregate(sections: &[SectionScore], weights: &[f64], strategy: Aggregation) -> SimilarityMap {
    let Some(first) = sections.first() else {
        return SimilarityMap::default();
    };

    let scores = first
        .department_scores
        .iter()
        .map(|dept| {
            let column = sections
                .iter()
                .map(|s| s.department_scores.get(&dept.name).unwrap_or(0.0) as f64);
            let value = match strategy {
                Aggregation::Mean => column.sum::<f64>() / sections.len() as f64,
                Aggregation::Max => column.fold(f64::NEG_INFINITY, f64::max),
                Aggregation::Weighted => {
                    let total: f64 = weights.iter().sum();
                    column.zip(weights).map(|(v, w)| v * w).sum::<f64>() / total
                }
            };
            ConceptScore {
                name: dept.name.clone(),
                score: value as f32,
            }
        })
        .collect();

    SimilarityMap::new(scores).rounded(3)
}
