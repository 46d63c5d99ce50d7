//! Analysis submission and retrieval handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use application::ports::{AnalysisState, AnalysisTask};
use domain::value_objects::AnalysisId;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{error::ApiError, state::AppState};

/// Description analysis submission body
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionRequest {
    pub description: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub parallel: Option<bool>,
}

/// Accepted-submission response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub analysis_id: String,
    pub status: String,
}

impl SubmitResponse {
    fn pending(id: AnalysisId) -> Self {
        Self {
            analysis_id: id.to_string(),
            status: "pending".to_string(),
        }
    }
}

/// Task status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub analysis_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<String>,
}

impl StatusResponse {
    fn from_task(task: &AnalysisTask) -> Self {
        let (status, error, feedback) = match &task.state {
            AnalysisState::Pending => ("pending", None, Vec::new()),
            AnalysisState::Completed(_) => ("completed", None, Vec::new()),
            AnalysisState::Failed(failure) => (
                "failed",
                Some(failure.message.clone()),
                failure.feedback.clone(),
            ),
        };
        Self {
            analysis_id: task.id.to_string(),
            status: status.to_string(),
            error,
            feedback,
        }
    }
}

/// Submit a description analysis; replies immediately with the pending id
#[instrument(skip(state, request), fields(description_len = request.description.len()))]
pub async fn submit_description(
    State(state): State<AppState>,
    Json(request): Json<DescriptionRequest>,
) -> Result<Response, ApiError> {
    if request.description.trim().is_empty() {
        return Err(ApiError::BadRequest("description must not be empty".to_string()));
    }

    let parallel = request.parallel.unwrap_or(state.parallel_default);
    let id = state
        .dispatcher
        .submit_description(request.description, request.model, parallel);

    Ok((StatusCode::ACCEPTED, Json(SubmitResponse::pending(id))).into_response())
}

/// Submit a codebase analysis as a multipart zip upload
#[instrument(skip(state, multipart))]
pub async fn submit_codebase(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut archive: Option<Vec<u8>> = None;
    let mut model: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("could not read upload: {e}")))?;
                archive = Some(bytes.to_vec());
            }
            Some("model") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("invalid model field: {e}")))?;
                if !text.trim().is_empty() {
                    model = Some(text);
                }
            }
            _ => {}
        }
    }

    let archive = archive
        .ok_or_else(|| ApiError::BadRequest("missing `file` field with a zip archive".to_string()))?;

    let extracted = infrastructure::extract_zip(&archive)
        .map_err(|e| ApiError::BadRequest(format!("could not extract archive: {e}")))?;

    info!(files = extracted.files(), "Codebase upload extracted");

    let id = state
        .dispatcher
        .submit_codebase(extracted.into_root(), model);

    Ok((StatusCode::ACCEPTED, Json(SubmitResponse::pending(id))).into_response())
}

/// Report the lifecycle status of an analysis
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let task = lookup(&state, &id)?;
    Ok(Json(StatusResponse::from_task(&task)))
}

/// Return the finished threat model, or the failure that replaced it
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let task = lookup(&state, &id)?;
    match task.state {
        AnalysisState::Pending => Err(ApiError::Conflict(
            "analysis is still running; poll the status endpoint".to_string(),
        )),
        AnalysisState::Completed(model) => Ok(Json(*model).into_response()),
        AnalysisState::Failed(failure) => {
            Err(ApiError::Unprocessable(failure.message, failure.feedback))
        }
    }
}

/// An unparseable id cannot name a known analysis, so both cases are 404
fn lookup(state: &AppState, id: &str) -> Result<AnalysisTask, ApiError> {
    let parsed = AnalysisId::parse(id)
        .map_err(|_| ApiError::NotFound(format!("no analysis with id {id}")))?;
    state
        .store
        .get(&parsed)
        .ok_or_else(|| ApiError::NotFound(format!("no analysis with id {id}")))
}
