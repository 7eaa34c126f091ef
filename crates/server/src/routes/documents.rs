use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use crate::store::{DocumentFilter, DocumentRecord};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_UPLOADER: &str = "admin";
const DEFAULT_FILENAME: &str = "document.txt";

/// Already-extracted text filed under a department
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub department: String,
    pub text: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchProcessRequest {
    pub documents: Vec<ProcessRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchProcessResponse {
    pub processed: usize,
    pub misfiled: usize,
    pub with_alerts: usize,
    pub results: Vec<DocumentRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub misfiled: Option<bool>,
    #[serde(default)]
    pub has_alerts: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub documents: Vec<DocumentRecord>,
}

fn default_limit() -> usize {
    50
}

/// Multipart upload: `department`, optional `uploaded_by`, and `file`.
///
/// The file is written to `upload_dir` as `{uuid}_{name}` before extraction, so the
/// stored record can point back at it.
pub async fn upload_document(
    State(state): State<Arc<ServerState>>,
    mut multipart: Multipart,
) -> ServerResult<impl IntoResponse> {
    let mut department = None;
    let mut uploaded_by = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("department") => department = Some(field.text().await?),
            Some("uploaded_by") => uploaded_by = Some(field.text().await?),
            Some("file") => {
                let name = sanitize_filename(field.file_name());
                let bytes = field.bytes().await?;
                file = Some((name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let department = required_department(department)?;
    let (filename, bytes) =
        file.ok_or_else(|| ServerError::BadRequest("missing 'file' field".to_string()))?;

    let id = Uuid::new_v4();
    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    let path = state.config.upload_dir.join(format!("{id}_{filename}"));
    tokio::fs::write(&path, &bytes).await?;

    tracing::info!(
        document_id = %id,
        filename = %filename,
        bytes = bytes.len(),
        department = %department,
        "document_uploaded"
    );

    let result = state.engine.process_file(&department, &path).await;
    let record = DocumentRecord {
        id,
        filename,
        department,
        uploaded_by: uploaded_by
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPLOADER.to_string()),
        uploaded_at: Utc::now(),
        filepath: Some(path.to_string_lossy().into_owned()),
        result,
    };
    state.store.insert(record.clone());

    Ok((StatusCode::CREATED, Json(record)))
}

/// Process text the caller has already extracted.
pub async fn process_document(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ProcessRequest>,
) -> ServerResult<impl IntoResponse> {
    let record = run_request(&state, request).await?;
    state.store.insert(record.clone());
    Ok(Json(record))
}

/// Process several documents concurrently, answering in request order.
pub async fn process_batch(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<BatchProcessRequest>,
) -> ServerResult<impl IntoResponse> {
    if request.documents.is_empty() {
        return Err(ServerError::BadRequest("batch is empty".to_string()));
    }
    if let Some(i) = request
        .documents
        .iter()
        .position(|d| d.department.trim().is_empty())
    {
        return Err(ServerError::BadRequest(format!(
            "document {i}: department is required"
        )));
    }

    let concurrency = state.config.batch_concurrency.max(1);
    let mut results: Vec<(usize, ServerResult<DocumentRecord>)> =
        stream::iter(request.documents.into_iter().enumerate().map(|(idx, doc)| {
            let state = state.clone();
            async move { (idx, run_request(&state, doc).await) }
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;

    // Sort results by index to preserve input order
    results.sort_by_key(|(idx, _)| *idx);

    let mut records = Vec::with_capacity(results.len());
    for (_, result) in results {
        let record = result?;
        state.store.insert(record.clone());
        records.push(record);
    }

    let misfiled = records.iter().filter(|r| r.result.is_misfiled).count();
    let with_alerts = records.iter().filter(|r| r.result.has_alerts()).count();
    tracing::info!(
        processed = records.len(),
        misfiled,
        with_alerts,
        "batch_processed"
    );

    Ok(Json(BatchProcessResponse {
        processed: records.len(),
        misfiled,
        with_alerts,
        results: records,
    }))
}

pub async fn list_documents(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListQuery>,
) -> ServerResult<impl IntoResponse> {
    let filter = DocumentFilter {
        department: query.department,
        misfiled: query.misfiled,
        has_alerts: query.has_alerts,
    };
    let (total, documents) = state.store.list(&filter, query.offset, query.limit);
    Ok(Json(ListResponse { total, documents }))
}

pub async fn get_document(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ServerError::BadRequest(format!("invalid document id '{id}'")))?;
    state
        .store
        .get(&id)
        .map(Json)
        .ok_or(ServerError::NotFound)
}

async fn run_request(state: &ServerState, request: ProcessRequest) -> ServerResult<DocumentRecord> {
    let department = required_department(Some(request.department))?;
    let result = state.engine.process_text(&department, &request.text).await;

    Ok(DocumentRecord {
        id: Uuid::new_v4(),
        filename: request
            .filename
            .map(|f| sanitize_filename(Some(&f)))
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
        department,
        uploaded_by: request
            .uploaded_by
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPLOADER.to_string()),
        uploaded_at: Utc::now(),
        filepath: None,
        result,
    })
}

fn required_department(department: Option<String>) -> ServerResult<String> {
    department
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ServerError::BadRequest("department is required".to_string()))
}

/// Strip any directory components a client put in the filename.
fn sanitize_filename(name: Option<&str>) -> String {
    name.and_then(|n| FsPath::new(n).file_name())
        .and_then(|n| n.to_str())
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && n != "." && n != "..")
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
