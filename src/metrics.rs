use std::sync::Arc;
use std::time::{Duration, Instant};

use semantic::ProviderError;

use crate::result::ProcessingResult;
use crate::summary::SummarySource;

/// Metrics observer for pipeline stages.
///
/// Attached to one [`Engine`](crate::Engine) through its builder; engines without an observer
/// skip timing entirely.
pub trait PipelineMetrics: Send + Sync {
    fn record_extract(&self, latency: Duration, chars: usize);
    fn record_language(&self, latency: Duration, language: &str, is_target: bool);
    fn record_embedding(&self, latency: Duration, result: Result<(), ProviderError>);
    fn record_summary(&self, latency: Duration, source: SummarySource);
    fn record_document(&self, latency: Duration, result: &ProcessingResult);
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start(recorder: Option<&Arc<dyn PipelineMetrics>>) -> Option<Self> {
        recorder.map(|recorder| Self {
            recorder: Arc::clone(recorder),
            start: Instant::now(),
        })
    }

    pub(crate) fn record_extract(self, chars: usize) {
        self.recorder.record_extract(self.start.elapsed(), chars);
    }

    pub(crate) fn record_language(self, language: &str, is_target: bool) {
        self.recorder
            .record_language(self.start.elapsed(), language, is_target);
    }

    pub(crate) fn record_embedding(self, result: Result<(), ProviderError>) {
        self.recorder.record_embedding(self.start.elapsed(), result);
    }

    pub(crate) fn record_summary(self, source: SummarySource) {
        self.recorder.record_summary(self.start.elapsed(), source);
    }

    pub(crate) fn record_document(self, result: &ProcessingResult) {
        self.recorder.record_document(self.start.elapsed(), result);
    }
}
