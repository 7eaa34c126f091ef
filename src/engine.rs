use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use classifier::{classify_scores, ClassificationResult, Classifier, SimilarityMap};
use extract::{FileTextExtractor, TextExtractor};
use language::{char_prefix, LanguageDetector, LanguageGate, LanguageOutcome, WhatlangDetector};
use semantic::{
    embedder_from_config, summarizer_from_config, Embedding, EmbeddingProvider, LazyTranslator,
    Summarizer, Translator,
};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::{DocIntelConfig, PipelineConfig};
use crate::error::EngineError;
use crate::metrics::{MetricsSpan, PipelineMetrics};
use crate::result::ProcessingResult;
use crate::sections::{analyze_sections, SectionAnalysis};
use crate::summary::SummaryComposer;

/// Assembles an [`Engine`], with optional replacements for each provider.
///
/// Anything not replaced is built from the configuration.
pub struct EngineBuilder {
    cfg: DocIntelConfig,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    translator: Option<Arc<dyn Translator>>,
    detector: Option<Arc<dyn LanguageDetector>>,
    extractor: Option<Arc<dyn TextExtractor>>,
    metrics: Option<Arc<dyn PipelineMetrics>>,
}

impl EngineBuilder {
    pub fn new(cfg: DocIntelConfig) -> Self {
        Self {
            cfg,
            embedder: None,
            summarizer: None,
            translator: None,
            detector: None,
            extractor: None,
            metrics: None,
        }
    }

    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Validate the configuration, wire the providers and encode both catalogs.
    ///
    /// Fails if any catalog entry cannot be embedded.
    pub async fn build(self) -> Result<Engine, EngineError> {
        let cfg = self.cfg;
        cfg.validate()?;

        let embedder = match self.embedder {
            Some(e) => e,
            None => embedder_from_config(&cfg.semantic)?,
        };
        let summarizer = match self.summarizer {
            Some(s) => s,
            None => summarizer_from_config(&cfg.summarizer)?,
        };
        // The translation model is only needed once a target-language document shows up.
        let translator = self
            .translator
            .unwrap_or_else(|| Arc::new(LazyTranslator::new(cfg.translator.clone())));
        let detector = self
            .detector
            .unwrap_or_else(|| Arc::new(WhatlangDetector::new()));
        let extractor = match self.extractor {
            Some(x) => x,
            None => Arc::new(FileTextExtractor::new(cfg.extract.clone())?),
        };

        let gate = LanguageGate::new(cfg.language.clone(), detector, translator)?;

        let start = Instant::now();
        let classifier = Classifier::build(&cfg.classifier, embedder.as_ref()).await?;
        info!(
            model = embedder.model_name(),
            departments = classifier.departments().len(),
            alerts = classifier.alerts().len(),
            dimension = classifier.dimension(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "catalog_ready"
        );

        let composer = SummaryComposer::new(
            cfg.summary.clone(),
            summarizer,
            cfg.summarizer.min_length,
            cfg.summarizer.max_length,
        );

        Ok(Engine {
            pipeline: cfg.pipeline,
            embedder,
            extractor,
            gate,
            classifier: Arc::new(classifier),
            composer,
            metrics: self.metrics,
        })
    }
}

/// The document pipeline: extract, gate language, embed, classify, alert, check filing,
/// summarize.
///
/// Built once at startup and shared (it is `Send + Sync`); each call to
/// [`process_text`](Self::process_text) or [`process_file`](Self::process_file) is an independent
/// run that always yields exactly one [`ProcessingResult`].
pub struct Engine {
    pipeline: PipelineConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    extractor: Arc<dyn TextExtractor>,
    gate: LanguageGate,
    classifier: Arc<Classifier>,
    composer: SummaryComposer,
    metrics: Option<Arc<dyn PipelineMetrics>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("model", &self.embedder.model_name())
            .field("departments", &self.classifier.departments().len())
            .field("alerts", &self.classifier.alerts().len())
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn builder(cfg: DocIntelConfig) -> EngineBuilder {
        EngineBuilder::new(cfg)
    }

    /// Build an engine with every provider taken from `cfg`.
    pub async fn from_config(cfg: DocIntelConfig) -> Result<Self, EngineError> {
        EngineBuilder::new(cfg).build().await
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn pipeline_config(&self) -> &PipelineConfig {
        &self.pipeline
    }

    pub fn embedding_model(&self) -> &str {
        self.embedder.model_name()
    }

    /// Extract text from `path` and process it.
    ///
    /// Extraction runs on the blocking pool; an unreadable file is processed as empty text.
    pub async fn process_file(
        &self,
        declared_department: &str,
        path: impl AsRef<Path>,
    ) -> ProcessingResult {
        let extractor = Arc::clone(&self.extractor);
        let path = path.as_ref().to_path_buf();

        let span = MetricsSpan::start(self.metrics.as_ref());
        let text = match tokio::task::spawn_blocking(move || extractor.extract(&path)).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "extract_task_failed");
                String::new()
            }
        };
        if let Some(span) = span {
            span.record_extract(text.chars().count());
        }

        self.process_text(declared_department, &text).await
    }

    /// Run the pipeline on already-extracted text.
    pub async fn process_text(&self, declared_department: &str, text: &str) -> ProcessingResult {
        let span = info_span!("docintel.process", declared = %declared_department);
        self.run(declared_department, text).instrument(span).await
    }

    async fn run(&self, declared: &str, text: &str) -> ProcessingResult {
        let start = Instant::now();
        let document_metrics = MetricsSpan::start(self.metrics.as_ref());

        let result = if text.trim().is_empty() {
            debug!("document_unscorable");
            self.unscorable(declared)
        } else {
            self.score(declared, text).await
        };

        info!(
            predicted = %result.predicted_department,
            confidence = result.confidence,
            alerts = result.alerts.len(),
            is_misfiled = result.is_misfiled,
            language = %result.detected_language,
            summary_source = ?result.summary_source,
            elapsed_micros = start.elapsed().as_micros() as u64,
            "process_success"
        );
        if let Some(span) = document_metrics {
            span.record_document(&result);
        }
        result
    }

    fn unscorable(&self, declared: &str) -> ProcessingResult {
        let mut classification = ClassificationResult::unscored(declared);
        classification.all_scores = SimilarityMap::zeroed(self.classifier.departments().names());
        let summary = SummaryComposer::unscorable();
        ProcessingResult {
            predicted_department: classification.predicted_department,
            confidence: classification.confidence,
            all_scores: classification.all_scores,
            alerts: Vec::new(),
            is_misfiled: false,
            flag_reason: String::new(),
            summary: summary.text,
            summary_source: summary.source,
            detected_language: self.gate.config().default_language.clone(),
            translated_text: String::new(),
            original_text: String::new(),
            sections: Vec::new(),
            section_aggregate: Default::default(),
        }
    }

    async fn score(&self, declared: &str, text: &str) -> ProcessingResult {
        let language_metrics = MetricsSpan::start(self.metrics.as_ref());
        let language = self.gate.assess(text).await;
        if let Some(span) = language_metrics {
            span.record_language(&language.language, language.is_target);
        }

        let embedding = self.embed_document(&language).await;

        let department_scores = self.classifier.department_scores(&embedding);
        let classification = classify_scores(&department_scores)
            .unwrap_or_else(|| ClassificationResult::unscored(declared));
        let alerts = self.classifier.detect_alerts(&embedding);
        let verdict = self.classifier.misfile(declared, &classification);
        if verdict.is_misfiled {
            warn!(
                declared,
                predicted = %classification.predicted_department,
                confidence = classification.confidence,
                "document_misfiled"
            );
        }

        let summary_metrics = MetricsSpan::start(self.metrics.as_ref());
        let summary = self
            .composer
            .compose(&language.scoring_text, &language, &classification.all_scores)
            .await;
        if let Some(span) = summary_metrics {
            span.record_summary(summary.source);
        }

        let SectionAnalysis {
            sections,
            aggregate,
        } = if self.pipeline.sections.enabled {
            analyze_sections(
                &self.pipeline.sections,
                &language.scoring_text,
                self.embedder.as_ref(),
                &self.classifier,
            )
            .await
        } else {
            SectionAnalysis {
                sections: Vec::new(),
                aggregate: Default::default(),
            }
        };

        let stored = self.pipeline.stored_text_chars;
        ProcessingResult {
            predicted_department: classification.predicted_department,
            confidence: classification.confidence,
            all_scores: classification.all_scores,
            alerts,
            is_misfiled: verdict.is_misfiled,
            flag_reason: verdict.reason,
            summary: summary.text,
            summary_source: summary.source,
            detected_language: language.language,
            translated_text: char_prefix(&language.translated_text, stored).to_string(),
            original_text: char_prefix(text, stored).to_string(),
            sections,
            section_aggregate: aggregate,
        }
    }

    /// Embed the scoring text; a provider failure yields a zero vector, which scores zero
    /// against every concept.
    async fn embed_document(&self, language: &LanguageOutcome) -> Embedding {
        let prefix = char_prefix(&language.scoring_text, self.pipeline.embedding_input_chars);
        let input = if prefix.trim().is_empty() {
            self.pipeline.empty_document_text.as_str()
        } else {
            prefix
        };

        let span = MetricsSpan::start(self.metrics.as_ref());
        match self.embedder.embed(input).await {
            Ok(embedding) if embedding.dim() == self.classifier.dimension() => {
                if let Some(span) = span {
                    span.record_embedding(Ok(()));
                }
                embedding
            }
            Ok(embedding) => {
                let err = semantic::ProviderError::MalformedResponse(format!(
                    "embedding has dimension {}, catalog expects {}",
                    embedding.dim(),
                    self.classifier.dimension()
                ));
                warn!(error = %err, "embed_failed");
                if let Some(span) = span {
                    span.record_embedding(Err(err));
                }
                Embedding::zeros(self.classifier.dimension(), self.embedder.model_name())
            }
            Err(err) => {
                warn!(error = %err, "embed_failed");
                if let Some(span) = span {
                    span.record_embedding(Err(err));
                }
                Embedding::zeros(self.classifier.dimension(), self.embedder.model_name())
            }
        }
    }
}
