//! Summary composition.
//!
//! Every branch ends in text: provider failures fall back to an extractive summary, and the
//! department breakdown is appended whatever branch produced the body.

use std::sync::Arc;

use classifier::{format_percent, SimilarityMap};
use language::{char_prefix, LanguageOutcome};
use semantic::Summarizer;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Summary for a document whose extracted text was empty.
pub const UNABLE_TO_EXTRACT: &str = "• Unable to extract text from document";

/// Summary body for text below [`SummaryConfig::min_text_chars`].
pub const TOO_SHORT: &str = "• Document too short for meaningful summarization";

const ACTIONABLE_INSIGHTS: &str = "\n\nActionable Insights:\n\
• Review and verify content\n\
• Store in appropriate department\n\
• Follow up on any alerts";

const SIMILARITIES_HEADER: &str = "\n\nDepartment Similarities:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Trimmed texts shorter than this get [`TOO_SHORT`] instead of a summary.
    pub min_text_chars: usize,
    /// Prefix length handed to the abstractive summarizer.
    pub summarizer_input_chars: usize,
    /// Abstractive output shorter than this is treated as a failure.
    pub min_summary_chars: usize,
    pub max_bullets: usize,
    pub fallback_sentences: usize,
    /// Fallback sentences must be strictly longer than this once trimmed.
    pub fallback_min_sentence_chars: usize,
    /// Length of the single-bullet fallback used when no sentence qualifies.
    pub fallback_prefix_chars: usize,
    pub actionable_insights: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 100,
            summarizer_input_chars: 1024,
            min_summary_chars: 20,
            max_bullets: 6,
            fallback_sentences: 5,
            fallback_min_sentence_chars: 20,
            fallback_prefix_chars: 200,
            actionable_insights: true,
        }
    }
}

impl SummaryConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("summarizer_input_chars", self.summarizer_input_chars),
            ("max_bullets", self.max_bullets),
            ("fallback_sentences", self.fallback_sentences),
            ("fallback_prefix_chars", self.fallback_prefix_chars),
        ] {
            if value == 0 {
                return Err(format!("summary.{field} must be >= 1"));
            }
        }
        Ok(())
    }
}

/// Which branch produced a summary body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    Unscorable,
    Translation,
    TooShort,
    Abstractive,
    Extractive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedSummary {
    pub text: String,
    pub source: SummarySource,
}

/// Builds the reviewer-facing summary for one document.
pub struct SummaryComposer {
    cfg: SummaryConfig,
    summarizer: Arc<dyn Summarizer>,
    min_length: usize,
    max_length: usize,
}

impl std::fmt::Debug for SummaryComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryComposer")
            .field("cfg", &self.cfg)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

impl SummaryComposer {
    /// `min_length`/`max_length` are forwarded verbatim to the summarizer.
    pub fn new(
        cfg: SummaryConfig,
        summarizer: Arc<dyn Summarizer>,
        min_length: usize,
        max_length: usize,
    ) -> Self {
        Self {
            cfg,
            summarizer,
            min_length,
            max_length,
        }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.cfg
    }

    pub fn unscorable() -> ComposedSummary {
        ComposedSummary {
            text: UNABLE_TO_EXTRACT.to_string(),
            source: SummarySource::Unscorable,
        }
    }

    /// Summarize `scoring_text` and append the department breakdown from `department_scores`.
    pub async fn compose(
        &self,
        scoring_text: &str,
        language: &LanguageOutcome,
        department_scores: &SimilarityMap,
    ) -> ComposedSummary {
        let (mut text, source) = if language.is_target {
            // The summarizer is not trusted with this language; the gate already produced the
            // best text available.
            (language.translated_text.clone(), SummarySource::Translation)
        } else if scoring_text.trim().chars().count() < self.cfg.min_text_chars {
            (TOO_SHORT.to_string(), SummarySource::TooShort)
        } else {
            self.summarize(scoring_text).await
        };

        text.push_str(&department_similarities(department_scores));
        ComposedSummary { text, source }
    }

    async fn summarize(&self, text: &str) -> (String, SummarySource) {
        let input = char_prefix(text, self.cfg.summarizer_input_chars);
        match self
            .summarizer
            .summarize(input, self.min_length, self.max_length)
            .await
        {
            Ok(summary) if summary.trim().chars().count() >= self.cfg.min_summary_chars => {
                debug!(chars = summary.len(), "summary_abstractive");
                (self.format_abstractive(&summary), SummarySource::Abstractive)
            }
            Ok(summary) => {
                warn!(chars = summary.trim().chars().count(), "summary_too_short");
                (self.extractive(text), SummarySource::Extractive)
            }
            Err(err) => {
                warn!(error = %err, "summary_failed");
                (self.extractive(text), SummarySource::Extractive)
            }
        }
    }

    fn format_abstractive(&self, summary: &str) -> String {
        let bullets: Vec<String> = summary
            .split(". ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(self.cfg.max_bullets)
            .map(bullet)
            .collect();

        let mut out = bullets.join("\n");
        if self.cfg.actionable_insights {
            out.push_str(ACTIONABLE_INSIGHTS);
        }
        out
    }

    /// Deterministic summary from the leading sentences of `text`.
    pub fn extractive(&self, text: &str) -> String {
        let bullets: Vec<String> = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| s.chars().count() > self.cfg.fallback_min_sentence_chars)
            .take(self.cfg.fallback_sentences)
            .map(bullet)
            .collect();

        if bullets.is_empty() {
            let prefix = char_prefix(text, self.cfg.fallback_prefix_chars).trim();
            return format!("• {prefix}");
        }
        bullets.join("\n")
    }
}

fn bullet(sentence: &str) -> String {
    if sentence.ends_with('.') {
        format!("• {sentence}")
    } else {
        format!("• {sentence}.")
    }
}

/// Every department with its score as a percentage, highest first.
pub fn department_similarities(scores: &SimilarityMap) -> String {
    let mut out = String::from(SIMILARITIES_HEADER);
    for s in scores.sorted_desc() {
        out.push_str("\n• ");
        out.push_str(&s.name);
        out.push_str(": ");
        out.push_str(&format_percent(s.score));
    }
    out
}
