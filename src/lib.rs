//! Workspace umbrella crate for docintel, semantic document intake.
//!
//! An uploaded document is turned into one [`ProcessingResult`]: the department it most likely
//! belongs to, whether it looks misfiled, which alert concepts it touches, and a summary for
//! reviewers. The stages live in their own crates and are re-exported here:
//!
//! | Stage | Crate |
//! |---|---|
//! | text extraction | `extract` |
//! | language gate and translation | `language` |
//! | embedding / summarizer / translator providers | `semantic` |
//! | catalogs, scoring, alerts, misfiling policy | `classifier` |
//!
//! [`Engine`] wires them together. It is built once, encodes both concept catalogs at startup
//! (failing if it cannot), and is then shared read-only across concurrent documents.
//!
//! ```rust
//! use docintel::{DocIntelConfig, Engine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // Default configuration: stub embeddings, no summarizer, no translator.
//! let engine = Engine::from_config(DocIntelConfig::default()).await.unwrap();
//!
//! let empty = engine.process_text("HR", "").await;
//! assert_eq!(empty.predicted_department, "HR");
//! assert_eq!(empty.summary, docintel::UNABLE_TO_EXTRACT);
//!
//! let result = engine
//!     .process_text("Engineering", "workplace safety hazards and accident protection")
//!     .await;
//! assert_eq!(result.all_scores.len(), 5);
//! # }
//! ```

mod config;
mod engine;
mod error;
mod metrics;
mod result;
mod sections;
mod summary;

pub use crate::config::{ConfigLoadError, DocIntelConfig, PipelineConfig};
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::error::EngineError;
pub use crate::metrics::PipelineMetrics;
pub use crate::result::ProcessingResult;
pub use crate::sections::{
    analyze_sections, split_paragraphs, Aggregation, SectionAnalysis, SectionConfig, SectionScore,
};
pub use crate::summary::{
    department_similarities, ComposedSummary, SummaryComposer, SummaryConfig, SummarySource,
    TOO_SHORT, UNABLE_TO_EXTRACT,
};

pub use classifier::{
    AlertHit, CatalogError, ClassificationResult, Classifier, ClassifierConfig, ConceptSpec,
    MisfileVerdict, MisfilingPolicy, SimilarityMap,
};
pub use extract::{ExtractConfig, ExtractError, FileTextExtractor, TextExtractor};
pub use language::{DetectError, LanguageConfig, LanguageDetector, LanguageGate, LanguageOutcome};
pub use semantic::{
    Embedding, EmbeddingProvider, ProviderError, SemanticConfig, StubEmbedder, Summarizer,
    SummarizerConfig, Translator, TranslatorConfig,
};
