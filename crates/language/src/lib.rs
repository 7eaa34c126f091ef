//! Language gate for the docintel engine.
//!
//! Department and alert catalogs are written in English, so every document passes through this
//! gate before it is embedded. The gate looks at a bounded prefix of the text and asks:
//!
//! 1. Does any grapheme fall inside the target script's Unicode block?
//! 2. Does the prefix carry more mis-decoded bytes (`à´`, `àµ`, ...) than the threshold allows?
//!    Upstream extractors sometimes decode UTF-8 as Latin-1, which destroys the script signal.
//! 3. Does the opening mention the target language by name?
//!
//! If none fire, a general-purpose [`LanguageDetector`] gets the sample. When the text is judged
//! to be the target language it is translated chunk by chunk; a failing translator yields a
//! placeholder instead of an error, so scoring always has non-empty text to work with.
//!
//! Empty text is reported as the default language with nothing to translate.

mod config;
mod detect;
mod error;
mod gate;
mod script;

pub use crate::config::{LanguageConfig, UnicodeRange};
pub use crate::detect::{iso639_1, LanguageDetector, WhatlangDetector};
pub use crate::error::{DetectError, LanguageError};
pub use crate::gate::{LanguageGate, LanguageOutcome};
pub use crate::script::{analyze, char_prefix, ScriptSignals};
