//! Text extraction for docintel.
//!
//! Turns a stored upload into the plain text the engine scores. The contract is deliberately
//! narrow: given a path, produce a string, possibly empty. Errors stay inside this crate.
//!
//! - Format policy by extension (plain-text formats only; PDF/OCR are not handled here)
//! - Size limit checked from file metadata before reading
//! - Lossy UTF-8 decoding (invalid bytes skipped, BOM removed)
//! - Control characters stripped, line endings unified, paragraph breaks kept
//!
//! ```no_run
//! use extract::{FileTextExtractor, TextExtractor};
//! use std::path::Path;
//!
//! let extractor = FileTextExtractor::default();
//! let text = extractor.extract(Path::new("uploads/memo.txt"));
//! println!("{} chars", text.len());
//! ```

mod config;
mod error;
mod file;
mod normalize;

pub use crate::config::ExtractConfig;
pub use crate::error::ExtractError;
pub use crate::file::{FileTextExtractor, TextExtractor};
pub use crate::normalize::{clean_text, decode_lossy};
