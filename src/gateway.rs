//! Generation gateway: validate the request, require a provider, run exactly
//! one completion and hand back its text.
//!
//! Every failure becomes a `GatewayError`, which renders itself as the JSON
//! error body and status code the form expects.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::Difficulty;
use crate::prompt::{build_prompt, PromptInput};
use crate::protocol::{first_truthy, ErrorOut, GenerateIn, GenerateOut};
use crate::provider::ProviderError;
use crate::state::AppState;

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const MISSING_KEY: &str = "OPENAI_API_KEY not set";
pub const SERVER_ERROR: &str = "server_error";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
  /// Client sent incomplete or unreadable data (400).
  #[error("Missing required fields")]
  InvalidRequest { details: Option<String> },
  /// Deployment has no provider credential (500).
  #[error("OPENAI_API_KEY not set")]
  Configuration,
  /// The provider call failed or was rejected (500).
  #[error(transparent)]
  Provider(#[from] ProviderError),
}

impl GatewayError {
  pub fn status(&self) -> StatusCode {
    match self {
      GatewayError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
      GatewayError::Configuration | GatewayError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  pub fn body(&self) -> ErrorOut {
    match self {
      GatewayError::InvalidRequest { details } => ErrorOut { error: MISSING_FIELDS.into(), details: details.clone() },
      GatewayError::Configuration => ErrorOut { error: MISSING_KEY.into(), details: None },
      GatewayError::Provider(e) => ErrorOut { error: SERVER_ERROR.into(), details: Some(e.to_string()) },
    }
  }
}

impl IntoResponse for GatewayError {
  fn into_response(self) -> axum::response::Response {
    (self.status(), Json(self.body())).into_response()
  }
}

/// Request fields after presence checks, in the form they are interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
  pub grade: String,
  pub lesson: String,
  pub questions: String,
  pub subject: Option<String>,
  pub difficulty: Option<Difficulty>,
  pub include_answers: Option<bool>,
}

impl ValidatedRequest {
  pub fn prompt_input(&self) -> PromptInput<'_> {
    PromptInput {
      grade: &self.grade,
      lesson: &self.lesson,
      questions: &self.questions,
      subject: self.subject.as_deref(),
      difficulty: self.difficulty,
      include_answers: self.include_answers,
    }
  }
}

/// Presence checks only: grade, lesson/topic and questions/count must be truthy.
pub fn validate(body: &GenerateIn) -> Result<ValidatedRequest, GatewayError> {
  let grade = first_truthy(&[body.grade.as_ref()]);
  let lesson = first_truthy(&[body.lesson.as_ref(), body.topic.as_ref()]);
  let questions = first_truthy(&[body.questions.as_ref(), body.count.as_ref()]);

  match (grade, lesson, questions) {
    (Some(grade), Some(lesson), Some(questions)) => Ok(ValidatedRequest {
      grade,
      lesson,
      questions,
      subject: body.subject.as_ref().and_then(Value::as_str).map(str::to_string),
      difficulty: body.difficulty.as_ref().and_then(Value::as_str).and_then(Difficulty::from_label),
      include_answers: body.include_answers.as_ref().and_then(Value::as_bool),
    }),
    (grade, lesson, questions) => {
      let missing: Vec<&str> = [("grade", grade.is_none()), ("lesson", lesson.is_none()), ("questions", questions.is_none())]
        .iter()
        .filter(|(_, m)| *m)
        .map(|(name, _)| *name)
        .collect();
      Err(GatewayError::InvalidRequest { details: Some(format!("missing: {}", missing.join(", "))) })
    }
  }
}

/// Handle one generation request end to end.
#[instrument(level = "info", skip(state, body), fields(request_id = %Uuid::new_v4()))]
pub async fn generate(state: &AppState, body: &GenerateIn) -> Result<GenerateOut, GatewayError> {
  let req = validate(body).map_err(|e| {
    warn!(target: "worksheet", error = %e, details = ?e.body().details, "Rejected generation request");
    e
  })?;

  let provider = state.provider.as_ref().ok_or_else(|| {
    error!(target: "worksheet", "Generation requested but no provider credential is configured");
    GatewayError::Configuration
  })?;

  debug!(
    target: "worksheet",
    subject = ?req.subject,
    difficulty = ?req.difficulty,
    include_answers = ?req.include_answers,
    "Optional parameters received (not forwarded to the prompt)"
  );

  let prompt = build_prompt(&state.prompts, &req.prompt_input());
  info!(target: "worksheet", grade = %req.grade, questions = %req.questions, lesson_len = req.lesson.chars().count(), model = %provider.model(), prompt_len = prompt.len(), "Requesting worksheet completion");

  match provider.complete(&prompt).await {
    Ok(text) => {
      if text.is_empty() {
        warn!(target: "worksheet", "Provider returned no content; answering with empty text");
      }
      info!(target: "worksheet", text_len = text.len(), "Worksheet generated");
      Ok(GenerateOut { text })
    }
    Err(e) => {
      error!(target: "worksheet", error = %e, "Worksheet generation failed");
      Err(GatewayError::Provider(e))
    }
  }
}
