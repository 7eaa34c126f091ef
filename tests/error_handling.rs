mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::*;
use docintel::{
    ConceptSpec, DocIntelConfig, Embedding, EmbeddingProvider, Engine, EngineError, ProviderError,
    SummarySource,
};

struct Unreachable;

#[async_trait]
impl EmbeddingProvider for Unreachable {
    async fn embed(&self, _text: &str) -> Result<Embedding, ProviderError> {
        Err(ProviderError::Http("connection refused".into()))
    }

    fn model_name(&self) -> &str {
        "unreachable"
    }
}

#[tokio::test]
async fn unreachable_embedder_refuses_to_start() {
    let err = Engine::builder(DocIntelConfig::default())
        .embedder(Arc::new(Unreachable))
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Catalog(_)));
}

#[tokio::test]
async fn invalid_configuration_refuses_to_start() {
    let mut cfg = DocIntelConfig::default();
    cfg.classifier.departments = vec![
        ConceptSpec::new("Safety", "safety"),
        ConceptSpec::new("Safety", "hazards"),
    ];
    let err = Engine::from_config(cfg).await.unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));

    let mut cfg = DocIntelConfig::default();
    cfg.semantic.mode = "api".into();
    let err = Engine::from_config(cfg).await.unwrap_err();
    assert!(err.to_string().contains("api_url"));
}

#[tokio::test]
async fn embedding_failure_after_startup_scores_zero() {
    let h = harness().await;
    h.embedder.fail_from_now();

    let result = h.engine.process_text("HR", SAFETY_MEMO).await;

    assert_eq!(result.all_scores.len(), 3);
    assert!(result.all_scores.iter().all(|s| s.score == 0.0));
    assert_eq!(result.predicted_department, "Engineering");
    assert_eq!(result.confidence, 0.0);
    assert!(result.alerts.is_empty());
    assert!(!result.is_misfiled);
    // The summary path is independent of the embedding.
    assert_eq!(result.summary_source, SummarySource::Abstractive);
}

struct WrongDimension;

#[async_trait]
impl EmbeddingProvider for WrongDimension {
    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError> {
        // Catalog phrases are short; documents are long.
        let dim = if text.len() < 40 { 4 } else { 7 };
        Ok(Embedding::new(vec![1.0; dim], "wobbly", false))
    }

    fn model_name(&self) -> &str {
        "wobbly"
    }
}

#[tokio::test]
async fn dimension_drift_is_treated_as_embedding_failure() {
    let engine = Engine::builder(keyword_config())
        .embedder(Arc::new(WrongDimension))
        .detector(Arc::new(EnglishDetector))
        .build()
        .await
        .unwrap();
    let result = engine.process_text("HR", SAFETY_MEMO).await;
    assert!(result.all_scores.iter().all(|s| s.score == 0.0));
    assert!(!result.is_misfiled);
}

#[tokio::test]
async fn disabled_providers_never_surface_errors() {
    let engine = Engine::from_config(DocIntelConfig::default()).await.unwrap();

    let english = engine.process_text("Safety", &SAFETY_MEMO.repeat(2)).await;
    assert_eq!(english.summary_source, SummarySource::Extractive);

    let malayalam = engine.process_text("Safety", MALAYALAM).await;
    assert_eq!(malayalam.detected_language, "ml");
    assert!(malayalam
        .translated_text
        .starts_with("[Translation attempted from ml] "));
}
