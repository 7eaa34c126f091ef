//! Text-to-text providers: abstractive summarization and translation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use crate::api::{ApiProviderKind, HttpEndpoint};
use crate::resilience::CircuitState;
use crate::{ProviderError, Summarizer, SummarizerConfig, Translator, TranslatorConfig};

/// Summarizer backed by a remote summarization endpoint.
///
/// Hugging Face style: `{"inputs": .., "parameters": {"min_length", "max_length", "do_sample"}}`
/// answered by `[{"summary_text": ..}]`.
#[derive(Debug)]
pub struct ApiSummarizer {
    endpoint: HttpEndpoint,
    model_name: String,
}

impl ApiSummarizer {
    pub fn new(cfg: &SummarizerConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: HttpEndpoint::new("summarizer", &cfg.endpoint)?,
            model_name: cfg.model_name.clone(),
        })
    }

    pub fn circuit_state(&self) -> Option<CircuitState> {
        self.endpoint.circuit_state()
    }
}

#[async_trait]
impl Summarizer for ApiSummarizer {
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, ProviderError> {
        let payload = match self.endpoint.kind() {
            ApiProviderKind::HuggingFace => json!({
                "inputs": text,
                "parameters": {
                    "min_length": min_length,
                    "max_length": max_length,
                    "do_sample": false,
                    "truncation": true,
                }
            }),
            ApiProviderKind::OpenAI | ApiProviderKind::Custom => json!({
                "text": text,
                "model": self.model_name,
                "min_length": min_length,
                "max_length": max_length,
            }),
        };
        let response = self.endpoint.post_json(payload).await?;
        parse_generated_text(response, &["summary_text", "summary", "generated_text"])
    }
}

/// Translator backed by a remote translation endpoint (`[{"translation_text": ..}]`).
#[derive(Debug)]
pub struct ApiTranslator {
    endpoint: HttpEndpoint,
    model_name: String,
}

impl ApiTranslator {
    pub fn new(cfg: &TranslatorConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: HttpEndpoint::new("translator", &cfg.endpoint)?,
            model_name: cfg.model_name.clone(),
        })
    }
}

#[async_trait]
impl Translator for ApiTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let payload = match self.endpoint.kind() {
            ApiProviderKind::HuggingFace => json!({ "inputs": text }),
            ApiProviderKind::OpenAI | ApiProviderKind::Custom => {
                json!({ "text": text, "model": self.model_name })
            }
        };
        let response = self.endpoint.post_json(payload).await?;
        parse_generated_text(response, &["translation_text", "translation", "generated_text"])
    }
}

/// Summarizer that always fails, which routes every document to the extractive fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSummarizer;

#[async_trait]
impl Summarizer for UnavailableSummarizer {
    async fn summarize(&self, _: &str, _: usize, _: usize) -> Result<String, ProviderError> {
        Err(ProviderError::Disabled("summarizer".into()))
    }
}

/// Translator that always fails; non-English text gets the untranslated placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableTranslator;

#[async_trait]
impl Translator for UnavailableTranslator {
    async fn translate(&self, _: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Disabled("translator".into()))
    }
}

/// Translator constructed on first use.
///
/// Most documents are English, so the endpoint (client, breaker, limiter) is only built when the
/// first non-English document arrives. Construction runs at most once; a construction failure is
/// remembered and returned to every later caller.
pub struct LazyTranslator {
    cfg: TranslatorConfig,
    inner: OnceCell<Result<Arc<dyn Translator>, ProviderError>>,
}

impl LazyTranslator {
    pub fn new(cfg: TranslatorConfig) -> Self {
        Self {
            cfg,
            inner: OnceCell::new(),
        }
    }

    /// Whether the underlying translator has been constructed yet.
    pub fn is_initialized(&self) -> bool {
        self.inner.initialized()
    }
}

impl std::fmt::Debug for LazyTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyTranslator")
            .field("mode", &self.cfg.mode)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[async_trait]
impl Translator for LazyTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let inner = self
            .inner
            .get_or_init(|| async {
                tracing::info!(mode = %self.cfg.mode, model = %self.cfg.model_name, "translator_init");
                crate::translator_from_config(&self.cfg)
            })
            .await;
        match inner {
            Ok(translator) => translator.translate(text).await,
            Err(err) => Err(err.clone()),
        }
    }
}

fn parse_generated_text(value: Value, keys: &[&str]) -> Result<String, ProviderError> {
    let item = match value {
        Value::Array(items) => items.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("provider returned an empty list".into())
        })?,
        other => other,
    };

    match item {
        Value::String(text) => Ok(text),
        Value::Object(mut map) => keys
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::String(text)) => Some(text),
                _ => None,
            })
            .ok_or_else(|| {
                ProviderError::MalformedResponse(format!("response is missing any of {keys:?}"))
            }),
        other => Err(ProviderError::MalformedResponse(format!(
            "unexpected generated-text payload: {other:?}"
        ))),
    }
}
