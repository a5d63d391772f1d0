//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs sizes and basic result info.

use std::sync::Arc;

use axum::{
  body::Bytes,
  extract::State,
  http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::domain::{grades, Difficulty, DEFAULT_GRADE, DEFAULT_QUESTION_COUNT, QUESTION_COUNTS, SUBJECTS};
use crate::export::{content_disposition, ExportDocument, ExportError, DOC_CONTENT_TYPE};
use crate::gateway::{generate, GatewayError};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, provider: state.provider_configured() })
}

#[instrument(level = "info")]
pub async fn http_options() -> impl IntoResponse {
  Json(OptionsOut {
    grades: grades(),
    subjects: SUBJECTS.iter().map(|s| s.to_string()).collect(),
    counts: QUESTION_COUNTS.to_vec(),
    difficulties: Difficulty::ALL.to_vec(),
    defaults: FormDefaults {
      grade: DEFAULT_GRADE.to_string(),
      subject: SUBJECTS[0].to_string(),
      count: DEFAULT_QUESTION_COUNT,
      difficulty: Difficulty::default(),
      include_answers: false,
    },
  })
}

/// The body is parsed by hand so that a missing content type or broken JSON
/// still gets the JSON error shape instead of axum's plain-text rejection.
#[instrument(level = "info", skip(state, body), fields(body_len = body.len()))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Result<Json<GenerateOut>, GatewayError> {
  let req: GenerateIn = serde_json::from_slice(&body)
    .map_err(|e| GatewayError::InvalidRequest { details: Some(format!("invalid JSON body: {}", e)) })?;
  let out = generate(&state, &req).await?;
  Ok(Json(out))
}

#[instrument(level = "info", skip(body), fields(body_len = body.len()))]
pub async fn http_post_export(body: Bytes) -> Result<Response, ExportError> {
  let req: ExportIn = serde_json::from_slice(&body).map_err(|e| ExportError::InvalidBody(e.to_string()))?;
  let doc = ExportDocument::from_request(&req);
  info!(target: "worksheet", paragraphs = doc.paragraphs.len(), file = %doc.file_name(), "Document export");
  Ok(document_response(&doc))
}

#[instrument(level = "info", skip(body), fields(body_len = body.len()))]
pub async fn http_post_export_worksheet(body: Bytes) -> Result<Response, ExportError> {
  let req: ExportWorksheetIn = serde_json::from_slice(&body).map_err(|e| ExportError::InvalidBody(e.to_string()))?;
  req.worksheet.validate()?;
  let doc = ExportDocument::from_worksheet(&req.worksheet, req.show_answers);
  info!(target: "worksheet", questions = req.worksheet.questions.len(), show_answers = req.show_answers, file = %doc.file_name(), "Structured worksheet export");
  Ok(document_response(&doc))
}

fn document_response(doc: &ExportDocument) -> Response {
  (
    [
      (CONTENT_TYPE, DOC_CONTENT_TYPE.to_string()),
      (CONTENT_DISPOSITION, content_disposition(&doc.file_name())),
    ],
    doc.render(),
  )
    .into_response()
}
