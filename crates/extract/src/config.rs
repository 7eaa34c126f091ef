use serde::{Deserialize, Serialize};

use crate::ExtractError;

/// Policy for turning an uploaded file into text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Files larger than this are refused.
    pub max_file_bytes: u64,
    /// Lower-case extensions (without the dot) decoded as text.
    pub text_extensions: Vec<String>,
    /// Decode files with any other extension as text too, skipping invalid bytes. Off by default:
    /// binary formats such as PDF produce noise rather than text.
    pub decode_unknown_as_text: bool,
    /// Remove control characters other than newline and tab.
    pub strip_control_chars: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 50 * 1024 * 1024,
            text_extensions: ["txt", "text", "md", "csv", "log", "json", "xml", "html", "htm", "yaml", "yml"]
                .into_iter()
                .map(String::from)
                .collect(),
            decode_unknown_as_text: false,
            strip_control_chars: true,
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.max_file_bytes == 0 {
            return Err(ExtractError::InvalidConfig(
                "extract.max_file_bytes must be >= 1".into(),
            ));
        }
        if let Some(bad) = self
            .text_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(ExtractError::InvalidConfig(format!(
                "extract.text_extensions entries must be bare extensions, got {bad:?}"
            )));
        }
        Ok(())
    }

    pub fn is_text_extension(&self, ext: &str) -> bool {
        self.text_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}
