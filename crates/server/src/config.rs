use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use docintel::DocIntelConfig;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Rate limit: requests per minute per API key
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    /// API keys for authentication
    #[serde(default)]
    pub api_keys: HashSet<String>,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Engine YAML configuration; built-in offline defaults when unset
    #[serde(default)]
    pub engine_config_path: Option<PathBuf>,

    /// Directory uploaded files are written to before processing
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Documents processed at once by a batch request
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            rate_limit_per_minute: default_rate_limit_per_minute(),
            api_keys: HashSet::new(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            engine_config_path: None,
            upload_dir: default_upload_dir(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server.{toml,yaml,json}` file and
    /// `DOCINTEL_SERVER__*` environment variables, in increasing precedence.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(
                config::Environment::with_prefix("DOCINTEL_SERVER")
                    .separator("__")
                    .prefix_separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("api_keys"),
            );

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        // Add demo API key if none configured (for development)
        if config.api_keys.is_empty() {
            tracing::warn!("No API keys configured, using demo key 'demo-key-12345'");
            config.api_keys.insert("demo-key-12345".to_string());
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the router or batch handler cannot honour.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_concurrency == 0 {
            anyhow::bail!("batch_concurrency must be at least 1");
        }
        if self.max_body_size_mb == 0 {
            anyhow::bail!("max_body_size_mb must be at least 1");
        }
        if self.upload_dir.as_os_str().is_empty() {
            anyhow::bail!("upload_dir must not be empty");
        }
        Ok(())
    }

    /// Engine configuration from `engine_config_path`, or the offline defaults.
    pub fn engine_config(&self) -> anyhow::Result<DocIntelConfig> {
        match &self.engine_config_path {
            Some(path) => Ok(DocIntelConfig::from_file(path)?),
            None => Ok(DocIntelConfig::default()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_body_size_mb() -> usize {
    50
}

fn default_rate_limit_per_minute() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploaded_files")
}

fn default_batch_concurrency() -> usize {
    4
}
