use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::EndpointConfig;
use crate::normalize::l2_normalize_in_place;
use crate::resilience::{
    execute_with_retry_async, is_retryable_error, CircuitBreaker, CircuitState, RateLimitStats,
    RetryConfig, TokenBucket,
};
use crate::{Embedding, EmbeddingProvider, ProviderError, SemanticConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

impl ApiProviderKind {
    pub(crate) fn from_endpoint(endpoint: &EndpointConfig) -> Self {
        match endpoint.provider_name().as_str() {
            "hf" | "huggingface" => ApiProviderKind::HuggingFace,
            "openai" | "gpt" => ApiProviderKind::OpenAI,
            _ => ApiProviderKind::Custom,
        }
    }
}

/// One remote inference endpoint with its own HTTP client and resilience state.
///
/// Flow per call: circuit breaker check, rate-limit token, request with retry, then the final
/// outcome is recorded on the breaker.
#[derive(Debug)]
pub(crate) struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    provider: String,
    kind: ApiProviderKind,
    resilience: Option<Resilience>,
}

#[derive(Debug)]
struct Resilience {
    breaker: CircuitBreaker,
    limiter: TokenBucket,
    retry: RetryConfig,
}

impl HttpEndpoint {
    pub(crate) fn new(section: &str, endpoint: &EndpointConfig) -> Result<Self, ProviderError> {
        let url = endpoint
            .api_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidConfig(format!("{section}.api_url is required for api mode"))
            })?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(endpoint.api_timeout_secs.unwrap_or(30)))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| ProviderError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        let resilience = endpoint.enable_resilience.then(|| Resilience {
            breaker: CircuitBreaker::new(endpoint.circuit_breaker_config.unwrap_or_default()),
            limiter: TokenBucket::new(endpoint.rate_limit_config.unwrap_or_default()),
            retry: endpoint.retry_config.unwrap_or_default(),
        });

        Ok(Self {
            client,
            url,
            auth_header: endpoint.api_auth_header.clone(),
            provider: format!("{section}:{}", endpoint.provider_name()),
            kind: ApiProviderKind::from_endpoint(endpoint),
            resilience,
        })
    }

    pub(crate) fn kind(&self) -> ApiProviderKind {
        self.kind
    }

    pub(crate) fn provider(&self) -> &str {
        &self.provider
    }

    pub(crate) fn circuit_state(&self) -> Option<CircuitState> {
        self.resilience.as_ref().map(|r| r.breaker.current_state())
    }

    pub(crate) fn rate_limit_stats(&self) -> Option<RateLimitStats> {
        self.resilience.as_ref().map(|r| r.limiter.stats())
    }

    pub(crate) async fn post_json(&self, payload: Value) -> Result<Value, ProviderError> {
        let Some(res) = self.resilience.as_ref() else {
            return self.send(&payload).await;
        };

        if !res.breaker.allow_request() {
            tracing::warn!(provider = %self.provider, "provider_circuit_open");
            return Err(ProviderError::CircuitOpen(self.provider.clone()));
        }
        if !res.limiter.acquire().await {
            tracing::warn!(provider = %self.provider, "provider_rate_limited");
            return Err(ProviderError::RateLimited(self.provider.clone()));
        }

        let outcome = execute_with_retry_async(
            &res.retry,
            |attempt| {
                if attempt > 0 {
                    tracing::debug!(provider = %self.provider, attempt, "provider_retry");
                }
                self.send(&payload)
            },
            |err: &ProviderError| match err {
                ProviderError::Http(msg) => is_retryable_error(msg),
                _ => false,
            },
        )
        .await;

        match outcome.result {
            Ok(value) => {
                res.breaker.record_success();
                Ok(value)
            }
            Err(err) => {
                res.breaker.record_failure();
                tracing::warn!(
                    provider = %self.provider,
                    attempts = outcome.attempts,
                    elapsed_ms = outcome.total_duration.as_millis() as u64,
                    error = %err,
                    "provider_request_failed"
                );
                Err(err)
            }
        }
    }

    async fn send(&self, payload: &Value) -> Result<Value, ProviderError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .json(payload)
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http(format!("HTTP error {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON response: {e}")))
    }
}

/// Embedding provider backed by a remote feature-extraction endpoint.
///
/// Payload and response shapes follow the configured `api_provider`: Hugging Face
/// (`{"inputs": ..}`), OpenAI (`{"input": .., "model": ..}`), or custom (`{"text": ..}` /
/// `{"texts": [..]}`).
#[derive(Debug)]
pub struct ApiEmbedder {
    endpoint: HttpEndpoint,
    model_name: String,
    normalize: bool,
}

impl ApiEmbedder {
    pub fn new(cfg: &SemanticConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: HttpEndpoint::new("semantic", &cfg.endpoint)?,
            model_name: cfg.model_name.clone(),
            normalize: cfg.normalize,
        })
    }

    /// Circuit state of the underlying endpoint, `None` when resilience is off.
    pub fn circuit_state(&self) -> Option<CircuitState> {
        self.endpoint.circuit_state()
    }

    pub fn rate_limit_stats(&self) -> Option<RateLimitStats> {
        self.endpoint.rate_limit_stats()
    }

    fn finish(&self, mut vector: Vec<f32>) -> Result<Embedding, ProviderError> {
        if vector.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "API returned an empty embedding".into(),
            ));
        }
        if self.normalize {
            l2_normalize_in_place(&mut vector);
        }
        Ok(Embedding::new(vector, self.model_name.clone(), self.normalize))
    }
}

#[async_trait]
impl EmbeddingProvider for ApiEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError> {
        let payload = build_embedding_payload(self.endpoint.kind(), &[text], &self.model_name, false);
        let response = self.endpoint.post_json(payload).await?;
        let vector = parse_embeddings_from_value(response)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ProviderError::MalformedResponse("API response did not contain embeddings".into())
            })?;
        self.finish(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let payload = build_embedding_payload(self.endpoint.kind(), &refs, &self.model_name, true);
        let response = self.endpoint.post_json(payload).await?;
        let vectors = parse_embeddings_from_value(response)?;

        if vectors.len() != texts.len() {
            return Err(ProviderError::MalformedResponse(format!(
                "API returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        tracing::debug!(
            provider = %self.endpoint.provider(),
            count = vectors.len(),
            "embedding_batch_complete"
        );
        vectors.into_iter().map(|v| self.finish(v)).collect()
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

pub(crate) fn build_embedding_payload(
    provider: ApiProviderKind,
    texts: &[&str],
    model_name: &str,
    batch: bool,
) -> Value {
    let first = texts.first().copied().unwrap_or("");
    match provider {
        ApiProviderKind::HuggingFace => {
            if batch {
                json!({ "inputs": texts })
            } else {
                json!({ "inputs": first })
            }
        }
        ApiProviderKind::OpenAI => {
            if batch {
                json!({ "input": texts, "model": model_name })
            } else {
                json!({ "input": first, "model": model_name })
            }
        }
        ApiProviderKind::Custom => {
            if batch {
                json!({ "texts": texts })
            } else {
                json!({ "text": first })
            }
        }
    }
}

pub(crate) fn parse_embeddings_from_value(value: Value) -> Result<Vec<Vec<f32>>, ProviderError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }
            if let Some(embedding) = map.remove("embedding") {
                return parse_embedding_vector(embedding).map(|v| vec![v]);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                let mut vectors = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(mut obj) => match obj.remove("embedding") {
                            Some(embedding) => vectors.push(parse_embedding_vector(embedding)?),
                            None => {
                                return Err(ProviderError::MalformedResponse(
                                    "missing `embedding` field in data item".into(),
                                ))
                            }
                        },
                        _ => {
                            return Err(ProviderError::MalformedResponse(
                                "unexpected entry inside `data` array".into(),
                            ))
                        }
                    }
                }
                return Ok(vectors);
            }

            Err(ProviderError::MalformedResponse(
                "unsupported API response shape".into(),
            ))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>, ProviderError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, ProviderError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().map(|f| f as f32).ok_or_else(|| {
                    ProviderError::MalformedResponse("non-finite embedding value".into())
                }),
                other => Err(ProviderError::MalformedResponse(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(ProviderError::MalformedResponse(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}
