//! Script-level signals computed over a bounded text prefix.

use unicode_segmentation::UnicodeSegmentation;

use crate::LanguageConfig;

/// Counts gathered from one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptSignals {
    /// Grapheme clusters with at least one code point in the target block.
    pub block_hits: usize,
    /// Code points from the mis-decoding symbol set.
    pub mojibake_count: usize,
    /// A configured language-name hint occurs in the hint window.
    pub name_hint: bool,
}

impl ScriptSignals {
    /// Whether any signal marks the sample as the target language.
    pub fn fires(&self, mojibake_threshold: usize) -> bool {
        self.block_hits > 0 || self.mojibake_count > mojibake_threshold || self.name_hint
    }
}

/// The first `n` characters of `text`, cut on a char boundary.
pub fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn analyze(text: &str, cfg: &LanguageConfig) -> ScriptSignals {
    let sample = char_prefix(text, cfg.sample_chars);

    let block_hits = sample
        .graphemes(true)
        .filter(|g| g.chars().any(|c| cfg.target_block.contains(c)))
        .count();
    let mojibake_count = sample
        .chars()
        .filter(|c| cfg.mojibake_symbols.contains(c))
        .count();

    let name_hint = if cfg.name_hints.is_empty() {
        false
    } else {
        let window = char_prefix(text, cfg.hint_window_chars).to_lowercase();
        cfg.name_hints
            .iter()
            .filter(|hint| !hint.is_empty())
            .any(|hint| window.contains(hint.to_lowercase().as_str()))
    };

    ScriptSignals {
        block_hits,
        mojibake_count,
        name_hint,
    }
}
