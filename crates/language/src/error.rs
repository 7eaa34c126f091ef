use thiserror::Error;

/// Configuration errors for the language gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LanguageError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// The detector could not name a language for the sample.
///
/// Never surfaced past the gate: it maps to the configured "unknown" sentinel.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectError {
    #[error("sample has no detectable language content")]
    NoSignal,
    #[error("detection unreliable (confidence {confidence:.2})")]
    Unreliable { confidence: f64 },
}
