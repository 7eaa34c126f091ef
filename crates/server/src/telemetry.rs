//! Prometheus publishing for engine stages and processed documents.

use std::time::Duration;

use docintel::{PipelineMetrics, ProcessingResult, ProviderError, SummarySource};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

const STAGE_LATENCY: &str = "docintel_stage_duration_seconds";

/// Forwards engine stage timings to the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusMetrics;

impl PipelineMetrics for PrometheusMetrics {
    fn record_extract(&self, latency: Duration, chars: usize) {
        histogram!(STAGE_LATENCY, "stage" => "extract").record(latency.as_secs_f64());
        histogram!("docintel_extracted_chars").record(chars as f64);
    }

    fn record_language(&self, latency: Duration, language: &str, is_target: bool) {
        histogram!(STAGE_LATENCY, "stage" => "language").record(latency.as_secs_f64());
        counter!(
            "docintel_languages_total",
            "language" => language.to_string(),
            "translated" => if is_target { "true" } else { "false" }
        )
        .increment(1);
    }

    fn record_embedding(&self, latency: Duration, result: Result<(), ProviderError>) {
        histogram!(STAGE_LATENCY, "stage" => "embedding").record(latency.as_secs_f64());
        if result.is_err() {
            counter!("docintel_embedding_failures_total").increment(1);
        }
    }

    fn record_summary(&self, latency: Duration, source: SummarySource) {
        histogram!(STAGE_LATENCY, "stage" => "summary").record(latency.as_secs_f64());
        counter!("docintel_summaries_total", "source" => summary_label(source)).increment(1);
    }

    fn record_document(&self, latency: Duration, result: &ProcessingResult) {
        histogram!(STAGE_LATENCY, "stage" => "document").record(latency.as_secs_f64());
        counter!(
            "docintel_documents_total",
            "predicted" => result.predicted_department.clone()
        )
        .increment(1);
        if result.is_misfiled {
            counter!("docintel_misfiled_total").increment(1);
        }
        for alert in &result.alerts {
            counter!("docintel_alerts_total", "label" => alert.label.clone()).increment(1);
        }
    }
}

fn summary_label(source: SummarySource) -> &'static str {
    match source {
        SummarySource::Unscorable => "unscorable",
        SummarySource::Translation => "translation",
        SummarySource::TooShort => "too_short",
        SummarySource::Abstractive => "abstractive",
        SummarySource::Extractive => "extractive",
    }
}

/// Install the process-wide Prometheus recorder.
///
/// Returns `None` when a recorder is already installed.
pub fn install_prometheus() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::warn!(error = %err, "metrics_recorder_unavailable");
            None
        }
    }
}
