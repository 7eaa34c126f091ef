//! YAML configuration for the docintel engine.
//!
//! One file configures every stage. Every field has a default, so a partial file is valid and
//! an empty one (apart from `version`) runs fully offline: stub embeddings, no summarizer and no
//! translator.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "intake"
//!
//! extract:
//!   max_file_bytes: 52428800
//!   text_extensions: ["txt", "md", "csv"]
//!
//! language:
//!   target_language: "ml"
//!   target_block: { start: 3328, end: 3455 }
//!   mojibake_threshold: 10
//!
//! semantic:
//!   mode: "api"
//!   model_name: "paraphrase-MiniLM-L6-v2"
//!   api_url: "https://api-inference.huggingface.co/pipeline/feature-extraction/sentence-transformers/paraphrase-MiniLM-L6-v2"
//!   api_auth_header: "Bearer hf_xxx"
//!   api_provider: "hf"
//!
//! summarizer:
//!   mode: "disabled"
//!
//! translator:
//!   mode: "disabled"
//!
//! classifier:
//!   alert_threshold: 0.50
//!   misfile_threshold: 0.60
//!   departments:
//!     - { name: "Finance", archetype: "budgets invoices payments accounting audit" }
//!
//! summary:
//!   min_text_chars: 100
//!
//! pipeline:
//!   embedding_input_chars: 5000
//!   sections:
//!     enabled: true
//!     aggregation: "weighted"
//! ```

use std::fs;
use std::path::Path;

use classifier::ClassifierConfig;
use extract::ExtractConfig;
use language::LanguageConfig;
use semantic::{SemanticConfig, SummarizerConfig, TranslatorConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sections::SectionConfig;
use crate::summary::SummaryConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for the whole engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocIntelConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    pub name: Option<String>,

    pub extract: ExtractConfig,
    pub language: LanguageConfig,

    /// Embedding provider
    pub semantic: SemanticConfig,

    pub summarizer: SummarizerConfig,
    pub translator: TranslatorConfig,
    pub classifier: ClassifierConfig,
    pub summary: SummaryConfig,
    pub pipeline: PipelineConfig,
}

impl Default for DocIntelConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            extract: ExtractConfig::default(),
            language: LanguageConfig::default(),
            semantic: SemanticConfig {
                mode: "stub".into(),
                model_name: "stub-hash-384".into(),
                ..Default::default()
            },
            summarizer: SummarizerConfig {
                mode: "disabled".into(),
                ..Default::default()
            },
            translator: TranslatorConfig {
                mode: "disabled".into(),
                ..Default::default()
            },
            classifier: ClassifierConfig::default(),
            summary: SummaryConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl DocIntelConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: DocIntelConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        let invalid = |e: &dyn std::fmt::Display| ConfigLoadError::Validation(e.to_string());
        self.extract.validate().map_err(|e| invalid(&e))?;
        self.language.validate().map_err(|e| invalid(&e))?;
        self.semantic.validate().map_err(|e| invalid(&e))?;
        self.summarizer.validate().map_err(|e| invalid(&e))?;
        self.translator.validate().map_err(|e| invalid(&e))?;
        self.classifier.validate().map_err(|e| invalid(&e))?;
        self.summary.validate().map_err(|e| invalid(&e))?;
        self.pipeline.validate().map_err(|e| invalid(&e))?;
        Ok(())
    }
}

/// Limits applied by the orchestrator itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Prefix of the scoring text that gets embedded.
    pub embedding_input_chars: usize,
    /// Embedded instead of an empty scoring text.
    pub empty_document_text: String,
    /// `original_text` and `translated_text` are truncated to this for storage.
    pub stored_text_chars: usize,
    pub sections: SectionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            embedding_input_chars: 5000,
            empty_document_text: "empty document".to_string(),
            stored_text_chars: 2000,
            sections: SectionConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.embedding_input_chars == 0 {
            return Err("pipeline.embedding_input_chars must be >= 1".into());
        }
        if self.empty_document_text.trim().is_empty() {
            return Err("pipeline.empty_document_text must not be blank".into());
        }
        self.sections.validate()
    }
}
