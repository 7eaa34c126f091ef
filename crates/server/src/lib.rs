//! DocIntel Server - HTTP REST API for document classification and alerting
//!
//! Wraps a [`docintel::Engine`] behind an Axum router:
//!
//! - **Uploads**: multipart files are saved, extracted, classified and stored
//! - **Processing**: single and batch classification of already-extracted text
//! - **Records**: list and fetch stored results, filtered by department, misfiling or alerts
//! - **Health & Metrics**: liveness/readiness probes and Prometheus text
//!
//! Requests to `/api/v1/*` carry an API key (`X-API-Key` or `Authorization: Bearer`)
//! and are rate limited per key.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! ## Public
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with catalog sizes
//! - `GET /metrics` - Prometheus metrics
//!
//! ## Protected
//!
//! - `POST /api/v1/documents` - Upload a file (multipart)
//! - `GET /api/v1/documents` - List stored records
//! - `GET /api/v1/documents/{id}` - Fetch one record
//! - `POST /api/v1/process` - Process extracted text
//! - `POST /api/v1/batch` - Process several documents

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
pub use store::{DocumentFilter, DocumentRecord, DocumentStore};
pub use telemetry::PrometheusMetrics;
