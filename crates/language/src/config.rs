//! Configuration for the language gate.
//!
//! Defaults target Malayalam (`"ml"`, Unicode block U+0D00..=U+0D7F). The mis-decoding symbols
//! are what Malayalam UTF-8 bytes (`E0 B4 xx` / `E0 B5 xx`) turn into when an upstream extractor
//! decodes them as Latin-1: runs of `à´` and `àµ`.
//!
//! ```rust
//! use language::LanguageConfig;
//!
//! let cfg = LanguageConfig::default();
//! assert_eq!(cfg.target_language, "ml");
//! assert!(cfg.target_block.contains('\u{0D15}'));
//! assert!(cfg.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::LanguageError;

/// Inclusive range of Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnicodeRange {
    pub start: u32,
    pub end: u32,
}

impl UnicodeRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, c: char) -> bool {
        (self.start..=self.end).contains(&(c as u32))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Number of leading characters inspected for script signals and detection.
    pub sample_chars: usize,
    /// Language code reported when the target signals fire.
    pub target_language: String,
    /// Unicode block of the target script.
    pub target_block: UnicodeRange,
    /// Code points characteristic of the target script mis-decoded as Latin-1.
    pub mojibake_symbols: Vec<char>,
    /// The mis-decoding signal fires when the count of `mojibake_symbols` exceeds this.
    pub mojibake_threshold: usize,
    /// Lower-cased words that, appearing in the first `hint_window_chars`, mark the text as the
    /// target language (e.g. a document that introduces itself as "Malayalam").
    pub name_hints: Vec<String>,
    pub hint_window_chars: usize,
    /// Code reported when no target signal fires and the detector is silent.
    pub default_language: String,
    /// Sentinel reported when the detector fails.
    pub unknown_language: String,
    /// Characters per translation request.
    pub translation_chunk_chars: usize,
    /// Only the first N chunks are translated.
    pub translation_max_chunks: usize,
    /// Characters of original text quoted in the translation placeholder.
    pub placeholder_chars: usize,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            sample_chars: 500,
            target_language: "ml".into(),
            target_block: UnicodeRange::new(0x0D00, 0x0D7F),
            mojibake_symbols: vec!['à', '´', 'µ'],
            mojibake_threshold: 10,
            name_hints: vec!["malayalam".into()],
            hint_window_chars: 200,
            default_language: "en".into(),
            unknown_language: "unknown".into(),
            translation_chunk_chars: 500,
            translation_max_chunks: 5,
            placeholder_chars: 200,
        }
    }
}

impl LanguageConfig {
    pub fn validate(&self) -> Result<(), LanguageError> {
        if self.sample_chars == 0 {
            return Err(LanguageError::InvalidConfig(
                "language.sample_chars must be >= 1".into(),
            ));
        }
        if self.target_language.trim().is_empty() {
            return Err(LanguageError::InvalidConfig(
                "language.target_language must not be empty".into(),
            ));
        }
        if self.target_block.start > self.target_block.end
            || char::from_u32(self.target_block.start).is_none()
            || char::from_u32(self.target_block.end).is_none()
        {
            return Err(LanguageError::InvalidConfig(format!(
                "language.target_block {:#06X}..={:#06X} is not a valid Unicode range",
                self.target_block.start, self.target_block.end
            )));
        }
        if self.translation_chunk_chars == 0 || self.translation_max_chunks == 0 {
            return Err(LanguageError::InvalidConfig(
                "language.translation_chunk_chars and translation_max_chunks must be >= 1".into(),
            ));
        }
        Ok(())
    }
}
