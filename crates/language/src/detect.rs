use crate::DetectError;

/// General-purpose language identification over a text sample.
pub trait LanguageDetector: Send + Sync {
    /// Returns a language code (ISO 639-1 where one exists).
    fn detect(&self, sample: &str) -> Result<String, DetectError>;
}

/// `whatlang`-backed detector.
///
/// When `require_reliable` is set, guesses whatlang itself marks unreliable are reported as
/// [`DetectError::Unreliable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector {
    pub require_reliable: bool,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            require_reliable: true,
        }
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, sample: &str) -> Result<String, DetectError> {
        let info = whatlang::detect(sample).ok_or(DetectError::NoSignal)?;
        if self.require_reliable && !info.is_reliable() {
            return Err(DetectError::Unreliable {
                confidence: info.confidence(),
            });
        }
        Ok(iso639_1(info.lang().code()).to_string())
    }
}

/// Map whatlang's ISO 639-3 codes to ISO 639-1; codes without a two-letter form pass through.
pub fn iso639_1(code: &str) -> &str {
    match code {
        "eng" => "en",
        "mal" => "ml",
        "tam" => "ta",
        "tel" => "te",
        "kan" => "kn",
        "hin" => "hi",
        "ben" => "bn",
        "mar" => "mr",
        "guj" => "gu",
        "pan" => "pa",
        "urd" => "ur",
        "ori" => "or",
        "sin" => "si",
        "nep" => "ne",
        "cmn" => "zh",
        "jpn" => "ja",
        "kor" => "ko",
        "ara" => "ar",
        "heb" => "he",
        "pes" => "fa",
        "rus" => "ru",
        "ukr" => "uk",
        "bel" => "be",
        "bul" => "bg",
        "srp" => "sr",
        "hrv" => "hr",
        "slv" => "sl",
        "mkd" => "mk",
        "pol" => "pl",
        "ces" => "cs",
        "slk" => "sk",
        "hun" => "hu",
        "ron" => "ro",
        "ell" => "el",
        "tur" => "tr",
        "aze" => "az",
        "uzb" => "uz",
        "deu" => "de",
        "fra" => "fr",
        "spa" => "es",
        "por" => "pt",
        "ita" => "it",
        "nld" => "nl",
        "cat" => "ca",
        "dan" => "da",
        "swe" => "sv",
        "nob" => "nb",
        "fin" => "fi",
        "est" => "et",
        "lav" => "lv",
        "lit" => "lt",
        "afr" => "af",
        "lat" => "la",
        "epo" => "eo",
        "ind" => "id",
        "jav" => "jv",
        "vie" => "vi",
        "tha" => "th",
        "khm" => "km",
        "mya" => "my",
        "kat" => "ka",
        "hye" => "hy",
        "amh" => "am",
        "zul" => "zu",
        "sna" => "sn",
        "aka" => "ak",
        "yid" => "yi",
        "tgl" => "tl",
        other => other,
    }
}
