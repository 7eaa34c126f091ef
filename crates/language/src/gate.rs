use std::sync::Arc;

use semantic::Translator;
use serde::{Deserialize, Serialize};

use crate::script::{analyze, char_prefix};
use crate::{LanguageConfig, LanguageDetector, LanguageError};

/// Result of passing one document's text through the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOutcome {
    /// Detected language code, the target code, or the unknown sentinel.
    pub language: String,
    /// Whether the text was classified as the target non-English language.
    pub is_target: bool,
    /// Translation (or placeholder) when `is_target`; empty otherwise.
    pub translated_text: String,
    /// Translation when non-empty, else the original text.
    pub scoring_text: String,
}

/// Decides whether text needs translation before scoring, and obtains it.
///
/// Never fails: detector errors become the unknown sentinel and translator errors become a
/// fixed placeholder quoting the start of the original text.
pub struct LanguageGate {
    cfg: LanguageConfig,
    detector: Arc<dyn LanguageDetector>,
    translator: Arc<dyn Translator>,
}

impl std::fmt::Debug for LanguageGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageGate")
            .field("target_language", &self.cfg.target_language)
            .finish_non_exhaustive()
    }
}

impl LanguageGate {
    pub fn new(
        cfg: LanguageConfig,
        detector: Arc<dyn LanguageDetector>,
        translator: Arc<dyn Translator>,
    ) -> Result<Self, LanguageError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            detector,
            translator,
        })
    }

    pub fn config(&self) -> &LanguageConfig {
        &self.cfg
    }

    /// Classify `text` without translating it. Returns `(language, is_target)`.
    pub fn classify(&self, text: &str) -> (String, bool) {
        if text.is_empty() {
            return (self.cfg.default_language.clone(), false);
        }

        let signals = analyze(text, &self.cfg);
        if signals.fires(self.cfg.mojibake_threshold) {
            tracing::debug!(
                block_hits = signals.block_hits,
                mojibake = signals.mojibake_count,
                name_hint = signals.name_hint,
                language = %self.cfg.target_language,
                "language_script_signal"
            );
            return (self.cfg.target_language.clone(), true);
        }

        let sample = char_prefix(text, self.cfg.sample_chars);
        match self.detector.detect(sample) {
            Ok(lang) => {
                let is_target = lang == self.cfg.target_language;
                (lang, is_target)
            }
            Err(err) => {
                tracing::debug!(error = %err, "language_detect_failed");
                (self.cfg.unknown_language.clone(), false)
            }
        }
    }

    pub async fn assess(&self, text: &str) -> LanguageOutcome {
        let (language, is_target) = self.classify(text);
        if !is_target {
            return LanguageOutcome {
                language,
                is_target,
                translated_text: String::new(),
                scoring_text: text.to_string(),
            };
        }

        let translated_text = self.translate(text, &language).await;
        let scoring_text = if translated_text.is_empty() {
            text.to_string()
        } else {
            translated_text.clone()
        };
        LanguageOutcome {
            language,
            is_target,
            translated_text,
            scoring_text,
        }
    }

    async fn translate(&self, text: &str, language: &str) -> String {
        let chunks = chunk_chars(text, self.cfg.translation_chunk_chars);
        let total = chunks.len();
        let mut translated = Vec::with_capacity(total.min(self.cfg.translation_max_chunks));

        for chunk in chunks.into_iter().take(self.cfg.translation_max_chunks) {
            match self.translator.translate(chunk).await {
                Ok(out) => translated.push(out),
                Err(err) => {
                    tracing::warn!(language, error = %err, "translation_failed");
                    return self.placeholder(text, language);
                }
            }
        }

        let joined = translated.join(" ");
        if joined.trim().is_empty() {
            tracing::warn!(language, "translation_empty");
            return self.placeholder(text, language);
        }

        tracing::debug!(
            language,
            chunks = translated.len(),
            skipped_chunks = total.saturating_sub(translated.len()),
            "translation_complete"
        );
        joined
    }

    fn placeholder(&self, text: &str, language: &str) -> String {
        format!(
            "[Translation attempted from {language}] {}...",
            char_prefix(text, self.cfg.placeholder_chars)
        )
    }
}

/// Split into consecutive pieces of at most `size` characters.
fn chunk_chars(text: &str, size: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let head = char_prefix(rest, size.max(1));
        chunks.push(head);
        rest = &rest[head.len()..];
    }
    chunks
}
