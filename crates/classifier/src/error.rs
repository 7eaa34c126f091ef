use semantic::ProviderError;
use thiserror::Error;

/// Failures while building catalogs or validating classifier settings.
///
/// All of these are fatal at startup: the engine refuses to serve with a partial catalog.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{catalog} catalog is empty")]
    Empty { catalog: String },
    #[error("{catalog} catalog has an entry with an empty name")]
    EmptyName { catalog: String },
    #[error("{catalog} catalog entry '{name}' has an empty archetype")]
    EmptyArchetype { catalog: String, name: String },
    #[error("{catalog} catalog contains '{name}' more than once")]
    DuplicateName { catalog: String, name: String },
    #[error("failed to encode {catalog} catalog: {source}")]
    Encoding {
        catalog: String,
        #[source]
        source: ProviderError,
    },
    #[error("{catalog} catalog entry '{name}' has dimension {found}, expected {expected}")]
    DimensionMismatch {
        catalog: String,
        name: String,
        expected: usize,
        found: usize,
    },
}
