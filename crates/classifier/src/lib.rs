//! Semantic classification for docintel.
//!
//! Given one document embedding, this crate answers three questions:
//!
//! - Which department does it belong to? ([`classify_scores`], argmax over the department
//!   catalog, first entry wins an exact tie)
//! - Which alert concepts does it touch? ([`detect_alerts`], strictly above the threshold,
//!   highest first)
//! - Is it filed in the wrong place? ([`MisfilingPolicy`], only when the classifier disagrees
//!   with the declared department and is confident about it)
//!
//! Everything is pure and deterministic once the [`ConceptCatalog`]s are encoded. Catalogs are
//! built once at startup by [`Classifier::build`]; an encoding failure there is fatal.
//!
//! ```rust
//! use classifier::{Classifier, ClassifierConfig};
//! use semantic::StubEmbedder;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let stub = StubEmbedder::new(128, true, "stub");
//! let classifier = Classifier::build(&ClassifierConfig::default(), &stub).await.unwrap();
//!
//! let doc = stub.embed_now("workplace safety hazards and accident protection");
//! let scores = classifier.score(&doc);
//! assert_eq!(scores.classification.all_scores.len(), 5);
//! # }
//! ```

mod alerts;
mod catalog;
mod config;
mod department;
mod engine;
mod error;
mod misfile;
mod similarity;

pub use crate::alerts::{detect_alerts, AlertHit};
pub use crate::catalog::{
    default_alerts, default_departments, ConceptCatalog, ConceptEntry, ConceptSpec,
};
pub use crate::config::ClassifierConfig;
pub use crate::department::{classify_scores, ClassificationResult};
pub use crate::engine::{Classifier, DocumentScores};
pub use crate::error::CatalogError;
pub use crate::misfile::{MisfileVerdict, MisfilingPolicy};
pub use crate::similarity::{
    format_percent, round_to, score_against, ConceptScore, SimilarityMap,
};
