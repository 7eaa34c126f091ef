use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::normalize::{clean_text, decode_lossy};
use crate::{ExtractConfig, ExtractError};

/// Produces the text content of a stored file.
///
/// The boundary never fails: anything the implementation cannot read comes back as an empty
/// string, which the engine treats as an unscorable document.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> String;
}

/// Extractor for plain-text formats, selected by file extension.
///
/// PDF and image formats are out of reach here (no parser, no OCR); they surface as
/// [`ExtractError::UnsupportedFormat`] and therefore as empty text.
#[derive(Debug, Clone, Default)]
pub struct FileTextExtractor {
    cfg: ExtractConfig,
}

impl FileTextExtractor {
    pub fn new(cfg: ExtractConfig) -> Result<Self, ExtractError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.cfg
    }

    /// Whether a file with this name would be decoded rather than refused.
    pub fn supports(&self, path: &Path) -> bool {
        if self.cfg.decode_unknown_as_text {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.cfg.is_text_extension(ext))
    }

    pub fn try_extract(&self, path: &Path) -> Result<String, ExtractError> {
        if !self.supports(path) {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("<none>");
            return Err(ExtractError::UnsupportedFormat(ext.to_string()));
        }

        let size = std::fs::metadata(path)?.len();
        if size > self.cfg.max_file_bytes {
            return Err(ExtractError::TooLarge {
                size,
                limit: self.cfg.max_file_bytes,
            });
        }

        let bytes = std::fs::read(path)?;
        Ok(self.extract_bytes(&bytes))
    }

    /// Decode and clean an in-memory payload.
    pub fn extract_bytes(&self, bytes: &[u8]) -> String {
        clean_text(&decode_lossy(bytes), self.cfg.strip_control_chars)
    }
}

impl TextExtractor for FileTextExtractor {
    fn extract(&self, path: &Path) -> String {
        let start = Instant::now();
        match self.try_extract(path) {
            Ok(text) => {
                info!(
                    path = %path.display(),
                    chars = text.chars().count(),
                    elapsed_micros = start.elapsed().as_micros() as u64,
                    "extract_success"
                );
                text
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    elapsed_micros = start.elapsed().as_micros() as u64,
                    "extract_failure"
                );
                String::new()
            }
        }
    }
}
