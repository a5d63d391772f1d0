//! Worksheet form model: the client-side state behind the generation page.
//!
//! Each activation is numbered. Only the newest activation may write its
//! result back; older responses that arrive late are dropped, and `loading`
//! stays set until the newest one lands.

use tracing::{debug, info};

use crate::client::{ClientError, GatewayClient};
use crate::domain::{Difficulty, DEFAULT_GRADE, DEFAULT_QUESTION_COUNT, SUBJECTS};
use crate::protocol::{ExportIn, GenerateIn, GenerateOut};

/// Minimum trimmed topic length (in characters) before generation is allowed.
pub const MIN_TOPIC_CHARS: usize = 2;
pub const FONT_SCALE_MIN: f32 = 0.9;
pub const FONT_SCALE_MAX: f32 = 1.3;
pub const FONT_SCALE_STEP: f32 = 0.05;

/// Shown when the gateway rejects a request without a message.
pub const GENERATION_FAILED: &str = "فشل التوليد";
/// Shown when a transport failure carries no message.
pub const GENERIC_ERROR: &str = "حدث خطأ";

#[derive(Debug, Clone)]
pub struct WorksheetForm {
  pub grade: String,
  pub subject: String,
  pub topic: String,
  pub count: u32,
  pub difficulty: Difficulty,
  pub include_answers: bool,
  font_scale: f32,
  loading: bool,
  text: Option<String>,
  /// Request that produced `text`; export labels come from here.
  generated_from: Option<GenerateIn>,
  error: String,
  issued: u64,
}

/// Ticket for one in-flight activation.
#[derive(Debug, Clone)]
pub struct PendingGeneration {
  seq: u64,
  pub body: GenerateIn,
}

impl Default for WorksheetForm {
  fn default() -> Self {
    Self {
      grade: DEFAULT_GRADE.to_string(),
      subject: SUBJECTS[0].to_string(),
      topic: String::new(),
      count: DEFAULT_QUESTION_COUNT,
      difficulty: Difficulty::default(),
      include_answers: false,
      font_scale: 1.0,
      loading: false,
      text: None,
      generated_from: None,
      error: String::new(),
      issued: 0,
    }
  }
}

impl WorksheetForm {
  pub fn can_generate(&self) -> bool {
    self.topic.trim().chars().count() >= MIN_TOPIC_CHARS
  }

  /// Whether the generate button is shown as enabled.
  pub fn button_enabled(&self) -> bool {
    self.can_generate() && !self.loading
  }

  pub fn loading(&self) -> bool {
    self.loading
  }

  pub fn text(&self) -> Option<&str> {
    self.text.as_deref()
  }

  pub fn error(&self) -> &str {
    &self.error
  }

  pub fn font_scale(&self) -> f32 {
    self.font_scale
  }

  /// Clamp to the slider range and snap to its step.
  pub fn set_font_scale(&mut self, value: f32) {
    let clamped = value.clamp(FONT_SCALE_MIN, FONT_SCALE_MAX);
    let steps = ((clamped - FONT_SCALE_MIN) / FONT_SCALE_STEP).round();
    self.font_scale = (FONT_SCALE_MIN + steps * FONT_SCALE_STEP).min(FONT_SCALE_MAX);
  }

  /// Request body in the rich form variant (topic/count + optional fields).
  pub fn request_body(&self) -> GenerateIn {
    GenerateIn {
      grade: Some(self.grade.clone().into()),
      topic: Some(self.topic.clone().into()),
      count: Some(self.count.into()),
      subject: Some(self.subject.clone().into()),
      difficulty: Some(self.difficulty.label().into()),
      include_answers: Some(self.include_answers.into()),
      ..Default::default()
    }
  }

  /// Begin an activation: set loading, clear the error, hand out a ticket.
  /// Returns None when the topic is too short.
  pub fn start(&mut self) -> Option<PendingGeneration> {
    if !self.can_generate() {
      return None;
    }
    self.issued += 1;
    self.loading = true;
    self.error.clear();
    debug!(target: "worksheet", seq = self.issued, "Generation started");
    Some(PendingGeneration { seq: self.issued, body: self.request_body() })
  }

  /// Apply an outcome. Returns false (and changes nothing) for a superseded ticket.
  pub fn complete(&mut self, pending: PendingGeneration, outcome: Result<GenerateOut, ClientError>) -> bool {
    if pending.seq != self.issued {
      debug!(target: "worksheet", seq = pending.seq, latest = self.issued, "Dropping superseded generation result");
      return false;
    }
    match outcome {
      Ok(out) => {
        info!(target: "worksheet", text_len = out.text.len(), "Worksheet received");
        self.text = Some(out.text);
        self.generated_from = Some(pending.body);
      }
      Err(e) => {
        info!(target: "worksheet", error = %e, "Worksheet generation failed");
        self.error = error_message(&e);
      }
    }
    self.loading = false;
    true
  }

  /// Export body for the current text, labelled with the inputs that produced it.
  pub fn export_request(&self) -> Option<ExportIn> {
    let text = self.text.clone()?;
    let from = self.generated_from.as_ref();
    Some(ExportIn {
      grade: from.and_then(|b| b.grade.clone()),
      topic: from.and_then(|b| b.topic.clone()),
      count: from.and_then(|b| b.count.clone()),
      text,
      ..Default::default()
    })
  }

  /// Full activation against a gateway. Returns false if nothing was sent.
  pub async fn generate(&mut self, client: &GatewayClient) -> bool {
    let Some(pending) = self.start() else { return false };
    let outcome = client.generate(&pending.body).await;
    self.complete(pending, outcome)
  }
}

/// Message shown to the user for a failed activation.
pub fn error_message(e: &ClientError) -> String {
  match e {
    ClientError::Api { error: Some(msg), .. } if !msg.is_empty() => msg.clone(),
    ClientError::Api { .. } => GENERATION_FAILED.to_string(),
    ClientError::Transport(msg) if !msg.is_empty() => msg.clone(),
    ClientError::Transport(_) => GENERIC_ERROR.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ok(text: &str) -> Result<GenerateOut, ClientError> {
    Ok(GenerateOut { text: text.into() })
  }

  #[test]
  fn defaults_match_the_catalog() {
    let f = WorksheetForm::default();
    assert_eq!(f.grade, "الصف 3");
    assert_eq!(f.subject, "اللغة العربية");
    assert_eq!(f.count, 10);
    assert_eq!(f.difficulty, Difficulty::Medium);
    assert!(!f.include_answers);
    assert_eq!(f.font_scale(), 1.0);
  }

  #[test]
  fn topic_needs_two_non_blank_characters() {
    let mut f = WorksheetForm::default();
    assert!(!f.can_generate());
    f.topic = "  م  ".into();
    assert!(!f.can_generate());
    f.topic = " دو ".into();
    assert!(f.can_generate());
    assert!(f.button_enabled());
  }

  #[test]
  fn start_is_refused_without_topic() {
    let mut f = WorksheetForm::default();
    assert!(f.start().is_none());
    assert!(!f.loading());
  }

  #[test]
  fn request_body_uses_the_rich_variant() {
    let mut f = WorksheetForm::default();
    f.topic = "دورة الماء".into();
    f.count = 15;
    f.include_answers = true;
    let v = serde_json::to_value(f.request_body()).expect("ser");
    assert_eq!(v["grade"], "الصف 3");
    assert_eq!(v["topic"], "دورة الماء");
    assert_eq!(v["count"], 15);
    assert_eq!(v["difficulty"], "متوسط");
    assert_eq!(v["includeAnswers"], true);
    assert!(v.get("lesson").is_none());
  }

  #[test]
  fn success_stores_text_and_clears_loading() {
    let mut f = WorksheetForm::default();
    f.topic = "الكسور".into();
    let p = f.start().expect("pending");
    assert!(f.loading());
    assert!(!f.button_enabled());
    assert!(f.complete(p, ok("سؤال 1")));
    assert!(!f.loading());
    assert_eq!(f.text(), Some("سؤال 1"));
    assert_eq!(f.error(), "");
  }

  #[test]
  fn export_is_labelled_with_the_inputs_that_produced_the_text() {
    let mut f = WorksheetForm::default();
    assert!(f.export_request().is_none());
    f.topic = "دورة الماء".into();
    let p = f.start().expect("pending");
    assert!(f.complete(p, ok("سؤال 1")));

    f.topic = "الكسور".into();
    f.grade = "الصف 7".into();
    f.count = 20;
    let req = f.export_request().expect("export body");
    assert_eq!(req.topic, Some("دورة الماء".into()));
    assert_eq!(req.grade, Some("الصف 3".into()));
    assert_eq!(req.count, Some(serde_json::json!(10)));
    assert_eq!(req.text, "سؤال 1");
    assert_eq!(crate::export::ExportDocument::from_request(&req).filename, "ورقة عمل - دورة الماء");
  }

  #[test]
  fn errors_use_the_body_message_or_a_fallback() {
    let mut f = WorksheetForm::default();
    f.topic = "الكسور".into();

    let p = f.start().expect("pending");
    f.complete(p, Err(ClientError::Api { status: 400, error: Some("Missing required fields".into()) }));
    assert_eq!(f.error(), "Missing required fields");
    assert!(!f.loading());

    let p = f.start().expect("pending");
    assert_eq!(f.error(), "", "start clears the previous error");
    f.complete(p, Err(ClientError::Api { status: 502, error: None }));
    assert_eq!(f.error(), GENERATION_FAILED);

    let p = f.start().expect("pending");
    f.complete(p, Err(ClientError::Transport(String::new())));
    assert_eq!(f.error(), GENERIC_ERROR);
  }

  #[test]
  fn failure_keeps_previous_text() {
    let mut f = WorksheetForm::default();
    f.topic = "الكسور".into();
    let p = f.start().expect("pending");
    f.complete(p, ok("old"));
    let p = f.start().expect("pending");
    f.complete(p, Err(ClientError::Transport("connection reset".into())));
    assert_eq!(f.text(), Some("old"));
    assert_eq!(f.error(), "connection reset");
  }

  #[test]
  fn superseded_results_are_dropped() {
    let mut f = WorksheetForm::default();
    f.topic = "الكسور".into();
    let first = f.start().expect("first");
    let second = f.start().expect("second");

    assert!(!f.complete(first, ok("stale")));
    assert!(f.loading(), "newest request still in flight");
    assert_eq!(f.text(), None);

    assert!(f.complete(second, ok("fresh")));
    assert!(!f.loading());
    assert_eq!(f.text(), Some("fresh"));
  }

  #[test]
  fn font_scale_is_clamped_and_snapped() {
    let mut f = WorksheetForm::default();
    f.set_font_scale(2.0);
    assert!((f.font_scale() - FONT_SCALE_MAX).abs() < 1e-6);
    f.set_font_scale(0.1);
    assert!((f.font_scale() - FONT_SCALE_MIN).abs() < 1e-6);
    f.set_font_scale(1.12);
    assert!((f.font_scale() - 1.1).abs() < 1e-4);
  }
}
