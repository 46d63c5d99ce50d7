//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::{io::Write, sync::Arc, time::Duration};

use application::{
    AnalysisDispatcher, AnalysisService, TaskStore,
    error::ApplicationError,
    ports::{CompletionCall, CompletionPort},
};
use async_trait::async_trait;
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use infrastructure::InMemoryTaskRegistry;
use presentation_http::{routes::create_router, state::AppState};
use serde_json::json;

/// Mock completion backend scripting the whole pipeline off prompt markers
struct MockCompletion {
    gate_verdict: String,
}

impl MockCompletion {
    fn passing() -> Self {
        Self {
            gate_verdict: r#"{"complete": "yes", "confirmation": "ok"}"#.to_string(),
        }
    }

    fn failing_gate() -> Self {
        Self {
            gate_verdict:
                r#"{"complete": "no", "feedback": ["missing data stores", "missing auth"]}"#
                    .to_string(),
        }
    }
}

#[async_trait]
impl CompletionPort for MockCompletion {
    async fn complete(&self, call: CompletionCall) -> Result<String, ApplicationError> {
        if call.prompt.contains("detailed enough") {
            Ok(self.gate_verdict.clone())
        } else if call.prompt.contains("architecture elements") {
            Ok(r#"{"components": [{"id": "web-app", "name": "Web App", "type": "UI"}]}"#
                .to_string())
        } else {
            Ok(r#"[{"name": "A threat"}]"#.to_string())
        }
    }
}

/// Backend that never answers, keeping every analysis pending
struct StalledCompletion;

#[async_trait]
impl CompletionPort for StalledCompletion {
    async fn complete(&self, _call: CompletionCall) -> Result<String, ApplicationError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(String::new())
    }
}

fn create_test_server_with(completion: Arc<dyn CompletionPort>) -> TestServer {
    let service = Arc::new(AnalysisService::new(completion, 3));
    let registry: Arc<dyn TaskStore> = Arc::new(InMemoryTaskRegistry::new());
    let dispatcher = Arc::new(AnalysisDispatcher::new(service, registry));
    let state = AppState::new(dispatcher, false);
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn create_test_server() -> TestServer {
    create_test_server_with(Arc::new(MockCompletion::passing()))
}

/// Poll the status endpoint until the run leaves `pending`
async fn wait_for_finish(server: &TestServer, id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = server.get(&format!("/v1/analyses/{id}/status")).await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        if body["status"] != "pending" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("analysis never finished");
}

fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        for (name, content) in entries {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .expect("start zip entry");
            writer.write_all(content.as_bytes()).expect("write zip entry");
        }
        writer.finish().expect("finish zip");
    }
    cursor.into_inner()
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn health_endpoint_returns_healthy() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

// ============ Description Submission Tests ============

#[tokio::test]
async fn description_submission_is_accepted_as_pending() {
    let server = create_test_server();

    let response = server
        .post("/v1/analyses/description")
        .json(&json!({
            "description": "A web app storing credentials in a SQL database."
        }))
        .await;

    response.assert_status(axum::http::StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "pending");
    assert!(body["analysisId"].is_string());
}

#[tokio::test]
async fn empty_description_is_rejected() {
    let server = create_test_server();

    let response = server
        .post("/v1/analyses/description")
        .json(&json!({ "description": "   " }))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn completed_analysis_serves_the_threat_model() {
    let server = create_test_server();

    let response = server
        .post("/v1/analyses/description")
        .json(&json!({
            "description": "A web app storing credentials in a SQL database."
        }))
        .await;
    let id = response.json::<serde_json::Value>()["analysisId"]
        .as_str()
        .expect("analysis id")
        .to_string();

    let status = wait_for_finish(&server, &id).await;
    assert_eq!(status["status"], "completed");

    let result = server.get(&format!("/v1/analyses/{id}/result")).await;
    result.assert_status_ok();
    let model: serde_json::Value = result.json();
    assert_eq!(model["application"]["name"], "Analyzed Application");
    assert_eq!(model["components"][0]["id"], "web-app");
    // One threat per STRIDE category from the scripted backend.
    assert_eq!(model["threats"].as_array().expect("threats").len(), 6);
    assert_eq!(model["threats"][0]["id"], "threat-1");
}

#[tokio::test]
async fn failed_gate_reports_feedback_on_status_and_result() {
    let server = create_test_server_with(Arc::new(MockCompletion::failing_gate()));

    let response = server
        .post("/v1/analyses/description")
        .json(&json!({ "description": "An app." }))
        .await;
    let id = response.json::<serde_json::Value>()["analysisId"]
        .as_str()
        .expect("analysis id")
        .to_string();

    let status = wait_for_finish(&server, &id).await;
    assert_eq!(status["status"], "failed");
    assert_eq!(status["feedback"][0], "missing data stores");
    assert!(status["error"].as_str().expect("error").contains("More details needed"));

    let result = server.get(&format!("/v1/analyses/{id}/result")).await;
    result.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = result.json();
    assert_eq!(body["code"], "unprocessable");
    assert_eq!(body["feedback"][1], "missing auth");
}

#[tokio::test]
async fn pending_result_is_a_conflict() {
    let server = create_test_server_with(Arc::new(StalledCompletion));

    let response = server
        .post("/v1/analyses/description")
        .json(&json!({ "description": "A web app." }))
        .await;
    let id = response.json::<serde_json::Value>()["analysisId"]
        .as_str()
        .expect("analysis id")
        .to_string();

    let result = server.get(&format!("/v1/analyses/{id}/result")).await;
    result.assert_status(axum::http::StatusCode::CONFLICT);
}

// ============ Status Lookup Tests ============

#[tokio::test]
async fn unknown_id_is_not_found() {
    let server = create_test_server();

    let response = server
        .get("/v1/analyses/550e8400-e29b-41d4-a716-446655440000/status")
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let server = create_test_server();

    let response = server.get("/v1/analyses/not-a-uuid/status").await;
    response.assert_status_not_found();

    let response = server.get("/v1/analyses/not-a-uuid/result").await;
    response.assert_status_not_found();
}

// ============ Codebase Upload Tests ============

#[tokio::test]
async fn codebase_upload_runs_the_whitebox_pipeline() {
    let server = create_test_server();
    let archive = build_zip(&[("app.py", "print('hi')"), ("routes.py", "def login(): pass")]);

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(archive)
            .file_name("codebase.zip")
            .mime_type("application/zip"),
    );
    let response = server.post("/v1/analyses/codebase").multipart(form).await;

    response.assert_status(axum::http::StatusCode::ACCEPTED);
    let id = response.json::<serde_json::Value>()["analysisId"]
        .as_str()
        .expect("analysis id")
        .to_string();

    let status = wait_for_finish(&server, &id).await;
    assert_eq!(status["status"], "completed");

    let result = server.get(&format!("/v1/analyses/{id}/result")).await;
    result.assert_status_ok();
    let model: serde_json::Value = result.json();
    assert_eq!(model["application"]["name"], "Analyzed Application (Whitebox)");
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let server = create_test_server();

    let form = MultipartForm::new().add_text("model", "gpt-4o");
    let response = server.post("/v1/analyses/codebase").multipart(form).await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().expect("error").contains("file"));
}

#[tokio::test]
async fn corrupt_archive_is_rejected() {
    let server = create_test_server();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"definitely not a zip".to_vec())
            .file_name("broken.zip")
            .mime_type("application/zip"),
    );
    let response = server.post("/v1/analyses/codebase").multipart(form).await;

    response.assert_status_bad_request();
}
