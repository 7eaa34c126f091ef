use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use docintel::{
    ClassifierConfig, ConceptSpec, DetectError, DocIntelConfig, Embedding, EmbeddingProvider,
    Engine, LanguageDetector, ProviderError,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;

const KEY: &str = "test-key";
const VOCAB: [&str; 3] = ["engineering", "personnel", "safety"];

/// One dimension per keyword, value = occurrence count.
struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError> {
        let lower = text.to_lowercase();
        let mut vector = vec![0.0f32; VOCAB.len()];
        for token in lower.split(|c: char| !c.is_alphanumeric()) {
            if let Some(i) = VOCAB.iter().position(|w| *w == token) {
                vector[i] += 1.0;
            }
        }
        Ok(Embedding::new(vector, "keywords", false))
    }

    fn model_name(&self) -> &str {
        "keywords"
    }
}

struct EnglishDetector;

impl LanguageDetector for EnglishDetector {
    fn detect(&self, _sample: &str) -> Result<String, DetectError> {
        Ok("en".into())
    }
}

struct TestApp {
    router: Router,
    _uploads: tempfile::TempDir,
}

async fn app_with(configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = ServerConfig {
        api_keys: HashSet::from([KEY.to_string()]),
        upload_dir: uploads.path().to_path_buf(),
        metrics_enabled: false,
        ..Default::default()
    };
    configure(&mut config);

    let engine_cfg = DocIntelConfig {
        classifier: ClassifierConfig {
            alert_threshold: 0.5,
            misfile_threshold: 0.55,
            departments: vec![
                ConceptSpec::new("Engineering", "engineering"),
                ConceptSpec::new("HR", "personnel"),
                ConceptSpec::new("Safety", "safety"),
            ],
            alerts: vec![ConceptSpec::new("safety hazards", "safety")],
        },
        ..Default::default()
    };
    let engine = Engine::builder(engine_cfg)
        .embedder(Arc::new(KeywordEmbedder))
        .detector(Arc::new(EnglishDetector))
        .build()
        .await
        .unwrap();

    TestApp {
        router: build_router(Arc::new(ServerState::new(config, engine))),
        _uploads: uploads,
    }
}

async fn app() -> TestApp {
    app_with(|_| {}).await
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .header("x-api-key", KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_authed(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header("authorization", format!("Bearer {KEY}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn ready_reports_catalogs() {
    let app = app().await;
    let (status, body) = send(&app, Request::get("/ready").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let engine = &body["components"]["engine"];
    assert_eq!(engine["departments"], 3);
    assert_eq!(engine["alerts"], 1);
    assert_eq!(engine["embedding_model"], "keywords");
}

#[tokio::test]
async fn metrics_disabled_is_not_found() {
    let app = app().await;
    let (status, _) = send(&app, Request::get("/metrics").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_require_a_key() {
    let app = app().await;
    let request = Request::post("/api/v1/process")
        .header("content-type", "application/json")
        .body(Body::from(json!({"department": "HR", "text": "x"}).to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_FAILED");

    let request = Request::get("/api/v1/documents")
        .header("x-api-key", "wrong")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rate_limit_applies_per_key() {
    let app = app_with(|c| c.rate_limit_per_minute = 2).await;
    for _ in 0..2 {
        let (status, _) = send(&app, get_authed("/api/v1/documents")).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(&app, get_authed("/api/v1/documents")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn process_flags_misfiled_document() {
    let app = app().await;
    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/process",
            json!({"department": "HR", "text": "Personnel notice about safety and safety drills"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["department"], "HR");
    assert_eq!(body["uploaded_by"], "admin");
    assert_eq!(body["predicted_department"], "Safety");
    assert_eq!(body["confidence"], json!(0.894));
    assert_eq!(body["is_misfiled"], true);
    assert_eq!(body["alerts"][0]["label"], "safety hazards");
}

#[tokio::test]
async fn process_rejects_missing_department() {
    let app = app().await;
    let (status, body) = send(
        &app,
        post_json("/api/v1/process", json!({"department": " ", "text": "safety"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn batch_keeps_request_order() {
    let app = app_with(|c| c.batch_concurrency = 2).await;
    let documents: Vec<Value> = ["engineering", "personnel", "safety", ""]
        .iter()
        .map(|text| json!({"department": "Engineering", "text": text}))
        .collect();
    let (status, body) = send(
        &app,
        post_json("/api/v1/batch", json!({ "documents": documents })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], 4);
    assert_eq!(body["misfiled"], 2);
    assert_eq!(body["with_alerts"], 1);
    let predicted: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["predicted_department"].as_str().unwrap())
        .collect();
    assert_eq!(predicted, ["Engineering", "HR", "Safety", "Engineering"]);
    assert_eq!(body["results"][3]["summary"], docintel::UNABLE_TO_EXTRACT);
}

#[tokio::test]
async fn stored_records_can_be_listed_and_fetched() {
    let app = app().await;
    for (department, text) in [("HR", "personnel"), ("HR", "safety"), ("Safety", "safety")] {
        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/process",
                json!({"department": department, "text": text}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, get_authed("/api/v1/documents?department=HR")).await;
    assert_eq!(body["total"], 2);

    let (_, body) = send(&app, get_authed("/api/v1/documents?misfiled=true")).await;
    assert_eq!(body["total"], 1);
    let id = body["documents"][0]["id"].as_str().unwrap().to_string();

    let (status, record) = send(&app, get_authed(&format!("/api/v1/documents/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["department"], "HR");
    assert_eq!(record["predicted_department"], "Safety");

    let (_, body) = send(&app, get_authed("/api/v1/documents?limit=1&offset=1")).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_document_and_route_are_json_404() {
    let app = app().await;
    let missing = uuid_like();
    let (status, body) = send(&app, get_authed(&format!("/api/v1/documents/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send(&app, get_authed("/api/v1/documents/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Request::get("/nope").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

fn uuid_like() -> &'static str {
    "00000000-0000-4000-8000-000000000000"
}

#[tokio::test]
async fn multipart_upload_is_saved_and_classified() {
    let app = app().await;
    let boundary = "XBOUNDARY";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"department\"\r\n\r\nEngineering\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"uploaded_by\"\r\n\r\nrita\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"../memo.txt\"\r\n\
         Content-Type: text/plain\r\n\r\nengineering review of the engineering bay\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let request = Request::post("/api/v1/documents")
        .header("x-api-key", KEY)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, record) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["filename"], "memo.txt");
    assert_eq!(record["uploaded_by"], "rita");
    assert_eq!(record["predicted_department"], "Engineering");
    assert_eq!(record["is_misfiled"], false);

    let path = record["filepath"].as_str().unwrap();
    assert!(path.ends_with("_memo.txt"));
    let saved = std::fs::read_to_string(path).unwrap();
    assert_eq!(saved, "engineering review of the engineering bay");
}

#[tokio::test]
async fn upload_without_file_is_bad_request() {
    let app = app().await;
    let body = "--B\r\nContent-Disposition: form-data; name=\"department\"\r\n\r\nHR\r\n--B--\r\n";
    let request = Request::post("/api/v1/documents")
        .header("x-api-key", KEY)
        .header("content-type", "multipart/form-data; boundary=B")
        .body(Body::from(body))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
