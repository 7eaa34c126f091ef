use classifier::CatalogError;
use extract::ExtractError;
use language::LanguageError;
use semantic::ProviderError;
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Failure while building an [`Engine`](crate::Engine).
///
/// Processing itself never fails; this is the only error the engine returns.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("language gate setup failed: {0}")]
    Language(#[from] LanguageError),

    #[error("extractor setup failed: {0}")]
    Extract(#[from] ExtractError),

    /// The catalogs could not be encoded; the engine refuses to start without them.
    #[error("catalog initialization failed: {0}")]
    Catalog(#[from] CatalogError),
}
