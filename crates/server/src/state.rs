use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::store::DocumentStore;
use crate::telemetry::{install_prometheus, PrometheusMetrics};
use dashmap::DashMap;
use docintel::Engine;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Rate limit tracking: API key -> (count, window_start)
    pub rate_limiter: Arc<DashMap<String, (u32, Instant)>>,

    /// Document engine, built once at startup
    pub engine: Arc<Engine>,

    pub store: Arc<DocumentStore>,

    /// Present when `/metrics` should render Prometheus text
    pub metrics: Option<PrometheusHandle>,

    pub started_at: Instant,
}

impl ServerState {
    /// Create state around an already-built engine.
    pub fn new(config: ServerConfig, engine: Engine) -> Self {
        Self {
            config: Arc::new(config),
            rate_limiter: Arc::new(DashMap::new()),
            engine: Arc::new(engine),
            store: Arc::new(DocumentStore::new()),
            metrics: None,
            started_at: Instant::now(),
        }
    }

    /// Build the engine from `config.engine_config_path` and install the metrics recorder.
    ///
    /// Fails if the catalogs cannot be encoded; the server must not start without them.
    pub async fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let engine_cfg = config
            .engine_config()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let metrics = if config.metrics_enabled {
            install_prometheus()
        } else {
            None
        };

        let mut builder = Engine::builder(engine_cfg);
        if metrics.is_some() {
            builder = builder.metrics(Arc::new(PrometheusMetrics));
        }
        let engine = builder.build().await?;

        let mut state = Self::new(config, engine);
        state.metrics = metrics;
        Ok(state)
    }

    /// Check if API key is valid
    pub fn is_valid_api_key(&self, key: &str) -> bool {
        // Compare against every key so timing does not reveal which prefix matched.
        self.config
            .api_keys
            .iter()
            .fold(false, |found, candidate| {
                found | bool::from(candidate.as_bytes().ct_eq(key.as_bytes()))
            })
    }

    /// Check rate limit for API key
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let now = Instant::now();
        let window = Duration::from_secs(60);
        let limit = self.config.rate_limit_per_minute;

        let mut entry = self.rate_limiter.entry(key.to_string()).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        // Reset if window has passed
        if now.duration_since(*window_start) > window {
            *count = 0;
            *window_start = now;
        }

        if *count >= limit {
            return false;
        }

        *count += 1;
        true
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
