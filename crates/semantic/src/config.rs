use serde::{Deserialize, Serialize};

use crate::resilience::{CircuitBreakerConfig, RateLimitConfig, RetryConfig};

/// HTTP endpoint settings shared by every API-backed provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    /// Inference endpoint URL.
    pub api_url: Option<String>,
    /// Authorization header (e.g., `"Bearer hf_xxx"`).
    pub api_auth_header: Option<String>,
    /// Remote provider hint: `"hf"`, `"openai"`, or `"custom"` (default).
    pub api_provider: Option<String>,
    /// Overall API timeout in seconds.
    pub api_timeout_secs: Option<u64>,
    /// Retry configuration for API calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_config: Option<RetryConfig>,
    /// Circuit breaker configuration for API resilience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker_config: Option<CircuitBreakerConfig>,
    /// Rate limiting configuration for API providers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_config: Option<RateLimitConfig>,
    /// Whether to enable resilience features (retry, circuit breaker, rate limiting).
    pub enable_resilience: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: Some(30),
            retry_config: None,
            circuit_breaker_config: None,
            rate_limit_config: None,
            enable_resilience: true,
        }
    }
}

impl EndpointConfig {
    /// Lower-cased provider label used for logs and error messages.
    pub fn provider_name(&self) -> String {
        self.api_provider
            .as_deref()
            .unwrap_or("custom")
            .to_ascii_lowercase()
    }
}

/// Embedding provider configuration.
///
/// # Example
/// ```
/// use semantic::SemanticConfig;
///
/// let cfg = SemanticConfig {
///     mode: "stub".into(),
///     stub_dimension: 64,
///     ..Default::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Inference mode selector: `"api"` (remote HTTP) or `"stub"` (deterministic, offline).
    pub mode: String,
    /// Friendly label surfaced on every [`Embedding`](crate::Embedding).
    pub model_name: String,
    /// Vector dimension produced by the stub embedder.
    pub stub_dimension: usize,
    /// Normalize the resulting vector to unit length.
    pub normalize: bool,
    #[serde(flatten)]
    pub endpoint: EndpointConfig,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "api".into(),
            model_name: "paraphrase-MiniLM-L6-v2".into(),
            stub_dimension: 384,
            normalize: true,
            endpoint: EndpointConfig::default(),
        }
    }
}

impl SemanticConfig {
    pub fn validate(&self) -> Result<(), String> {
        match self.mode.as_str() {
            "stub" => {
                if self.stub_dimension == 0 {
                    return Err("semantic.stub_dimension must be >= 1".into());
                }
                Ok(())
            }
            "api" => require_url("semantic", &self.endpoint),
            other => Err(format!(
                "semantic.mode must be one of [\"api\", \"stub\"], got {other:?}"
            )),
        }
    }
}

/// Abstractive summarizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummarizerConfig {
    /// `"api"` or `"disabled"`. A disabled summarizer always fails, which selects the
    /// extractive fallback.
    pub mode: String,
    pub model_name: String,
    /// Lower bound handed to the provider, in model tokens.
    pub min_length: usize,
    /// Upper bound handed to the provider, in model tokens.
    pub max_length: usize,
    #[serde(flatten)]
    pub endpoint: EndpointConfig,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            mode: "api".into(),
            model_name: "sshleifer/distilbart-cnn-12-6".into(),
            min_length: 50,
            max_length: 150,
            endpoint: EndpointConfig::default(),
        }
    }
}

impl SummarizerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_length > self.max_length {
            return Err(format!(
                "summarizer.min_length ({}) must not exceed max_length ({})",
                self.min_length, self.max_length
            ));
        }
        match self.mode.as_str() {
            "disabled" => Ok(()),
            "api" => require_url("summarizer", &self.endpoint),
            other => Err(format!(
                "summarizer.mode must be one of [\"api\", \"disabled\"], got {other:?}"
            )),
        }
    }
}

/// Translation provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslatorConfig {
    /// `"api"` or `"disabled"`.
    pub mode: String,
    pub model_name: String,
    #[serde(flatten)]
    pub endpoint: EndpointConfig,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            mode: "api".into(),
            model_name: "Helsinki-NLP/opus-mt-mul-en".into(),
            endpoint: EndpointConfig::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn validate(&self) -> Result<(), String> {
        match self.mode.as_str() {
            "disabled" => Ok(()),
            "api" => require_url("translator", &self.endpoint),
            other => Err(format!(
                "translator.mode must be one of [\"api\", \"disabled\"], got {other:?}"
            )),
        }
    }
}

fn require_url(section: &str, endpoint: &EndpointConfig) -> Result<(), String> {
    match endpoint.api_url.as_deref() {
        Some(url) if !url.trim().is_empty() => Ok(()),
        _ => Err(format!("{section}.api_url is required for api mode")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = SemanticConfig::default();
        assert_eq!(cfg.mode, "api");
        assert_eq!(cfg.model_name, "paraphrase-MiniLM-L6-v2");
        assert_eq!(cfg.stub_dimension, 384);
        assert!(cfg.normalize);
        assert_eq!(cfg.endpoint.api_timeout_secs, Some(30));
        assert!(cfg.endpoint.enable_resilience);
    }

    #[test]
    fn api_mode_requires_url() {
        let cfg = SemanticConfig::default();
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("api_url"));

        let cfg = SemanticConfig {
            endpoint: EndpointConfig {
                api_url: Some("https://example.com/embed".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn stub_mode_needs_no_url() {
        let cfg = SemanticConfig {
            mode: "stub".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn unknown_mode_rejected() {
        let cfg = SemanticConfig {
            mode: "onnx".into(),
            ..Default::default()
        };
        assert!(cfg.validate().unwrap_err().contains("semantic.mode"));
    }

    #[test]
    fn summarizer_length_bounds_checked() {
        let cfg = SummarizerConfig {
            mode: "disabled".into(),
            min_length: 200,
            max_length: 100,
            ..Default::default()
        };
        assert!(cfg.validate().unwrap_err().contains("min_length"));
    }

    #[test]
    fn disabled_translator_is_valid_without_url() {
        let cfg = TranslatorConfig {
            mode: "disabled".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn provider_name_defaults_to_custom() {
        let endpoint = EndpointConfig::default();
        assert_eq!(endpoint.provider_name(), "custom");

        let endpoint = EndpointConfig {
            api_provider: Some("HF".into()),
            ..Default::default()
        };
        assert_eq!(endpoint.provider_name(), "hf");
    }

    #[test]
    fn flattened_endpoint_serde_roundtrip() {
        let cfg = SemanticConfig {
            mode: "api".into(),
            endpoint: EndpointConfig {
                api_url: Some("https://api.example.com/embed".into()),
                api_auth_header: Some("Bearer token123".into()),
                api_provider: Some("openai".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["api_url"], "https://api.example.com/embed");
        let back: SemanticConfig = serde_json::from_value(json).unwrap();
        assert_eq!(cfg, back);
    }
}
