mod common;

use std::sync::Arc;

use common::*;
use semantic::{LazyTranslator, TranslatorConfig};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_match_sequential_runs() {
    let h = harness().await;
    let texts = [SAFETY_MEMO, "hazard now", "urgent hazard hazard safety", MALAYALAM, ""];

    let mut expected = Vec::new();
    for text in texts {
        expected.push(h.engine.process_text("HR", text).await);
    }

    let engine = Arc::new(h.engine);
    let mut handles = Vec::new();
    for round in 0..8 {
        for (i, text) in texts.iter().enumerate() {
            let engine = Arc::clone(&engine);
            let text = text.to_string();
            handles.push(tokio::spawn(async move {
                (round, i, engine.process_text("HR", &text).await)
            }));
        }
    }

    for handle in handles {
        let (_, i, result) = handle.await.unwrap();
        assert_eq!(result, expected[i]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn lazy_translator_built_on_first_target_document() {
    let lazy = Arc::new(LazyTranslator::new(TranslatorConfig {
        mode: "disabled".into(),
        ..Default::default()
    }));
    let embedder = Arc::new(KeywordEmbedder::default());
    let engine = Arc::new(
        builder(keyword_config(), &embedder)
            .translator(lazy.clone())
            .build()
            .await
            .unwrap(),
    );

    engine.process_text("HR", SAFETY_MEMO).await;
    assert!(!lazy.is_initialized());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.process_text("HR", MALAYALAM).await })
        })
        .collect();
    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result
            .translated_text
            .starts_with("[Translation attempted from ml]"));
    }
    assert!(lazy.is_initialized());
}
