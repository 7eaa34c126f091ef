#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docintel::{
    ClassifierConfig, ConceptSpec, DocIntelConfig, Embedding, EmbeddingProvider, Engine,
    EngineBuilder, LanguageDetector, ProviderError, Summarizer, Translator,
};
use language::DetectError;

pub const VOCAB: [&str; 5] = ["engineering", "personnel", "safety", "hazard", "urgent"];

/// Bag-of-words over [`VOCAB`]: one dimension per keyword, value = occurrence count.
#[derive(Default)]
pub struct KeywordEmbedder {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl KeywordEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every later call fail (catalogs are already encoded by then).
    pub fn fail_from_now(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Http("connection reset".into()));
        }
        let lower = text.to_lowercase();
        let mut vector = vec![0.0f32; VOCAB.len()];
        for token in lower.split(|c: char| !c.is_alphanumeric()) {
            if let Some(i) = VOCAB.iter().position(|w| *w == token) {
                vector[i] += 1.0;
            }
        }
        Ok(Embedding::new(vector, "keywords", false))
    }

    fn model_name(&self) -> &str {
        "keywords"
    }
}

/// Records every request and answers with a fixed summary, or fails.
pub struct RecordingSummarizer {
    pub calls: Mutex<Vec<(String, usize, usize)>>,
    reply: Result<String, ProviderError>,
}

impl RecordingSummarizer {
    pub fn replying(reply: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(ProviderError::Http("HTTP error 503".into())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Summarizer for RecordingSummarizer {
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), min_length, max_length));
        self.reply.clone()
    }
}

pub struct RecordingTranslator {
    pub calls: Mutex<Vec<String>>,
    reply: Result<String, ProviderError>,
}

impl RecordingTranslator {
    pub fn replying(reply: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(ProviderError::Http("model unavailable".into())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Translator for RecordingTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.reply.clone()
    }
}

/// Always answers English so tests never depend on statistical detection.
pub struct EnglishDetector;

impl LanguageDetector for EnglishDetector {
    fn detect(&self, _sample: &str) -> Result<String, DetectError> {
        Ok("en".into())
    }
}

/// One keyword per concept, so similarities can be computed by hand.
pub fn keyword_config() -> DocIntelConfig {
    DocIntelConfig {
        classifier: ClassifierConfig {
            alert_threshold: 0.5,
            misfile_threshold: 0.55,
            departments: vec![
                ConceptSpec::new("Engineering", "engineering"),
                ConceptSpec::new("HR", "personnel"),
                ConceptSpec::new("Safety", "safety"),
            ],
            alerts: vec![
                ConceptSpec::new("urgent operations", "urgent"),
                ConceptSpec::new("safety hazards", "hazard"),
            ],
        },
        ..Default::default()
    }
}

pub struct Harness {
    pub engine: Engine,
    pub embedder: Arc<KeywordEmbedder>,
    pub summarizer: Arc<RecordingSummarizer>,
    pub translator: Arc<RecordingTranslator>,
}

pub async fn harness_with(
    cfg: DocIntelConfig,
    summarizer: RecordingSummarizer,
    translator: RecordingTranslator,
) -> Harness {
    let embedder = Arc::new(KeywordEmbedder::default());
    let summarizer = Arc::new(summarizer);
    let translator = Arc::new(translator);
    let engine = builder(cfg, &embedder)
        .summarizer(summarizer.clone())
        .translator(translator.clone())
        .build()
        .await
        .expect("engine builds");
    Harness {
        engine,
        embedder,
        summarizer,
        translator,
    }
}

pub async fn harness() -> Harness {
    harness_with(
        keyword_config(),
        RecordingSummarizer::replying(
            "Pressure valves on level two are corroded. Crews replace them before the next shift",
        ),
        RecordingTranslator::replying("safety hazard report from the plant"),
    )
    .await
}

pub fn builder(cfg: DocIntelConfig, embedder: &Arc<KeywordEmbedder>) -> EngineBuilder {
    Engine::builder(cfg)
        .embedder(embedder.clone())
        .detector(Arc::new(EnglishDetector))
}

/// Long enough to be summarized; mentions safety four times and engineering three times.
pub const SAFETY_MEMO: &str = "Safety review for the east plant. The safety officer inspected the \
     engineering bay and the engineering workshop. Engineering teams must attend the safety \
     briefing before the safety certificate is renewed next month.";

pub const MALAYALAM: &str = "സുരക്ഷാ റിപ്പോർട്ട്: പ്ലാന്റിലെ അപകട സാധ്യതകൾ പരിശോധിച്ചു.";
