//! Worksheet prompt construction.
//!
//! Only grade, lesson and question count reach the model. Subject, difficulty
//! and answer inclusion ride along in `PromptInput` so callers can log them,
//! but they are not interpolated into the prompt.

use crate::config::Prompts;
use crate::domain::Difficulty;
use crate::util::fill_template;

#[derive(Clone, Debug, Default)]
pub struct PromptInput<'a> {
  pub grade: &'a str,
  pub lesson: &'a str,
  /// Literal question count as the client sent it ("10", "15", ...).
  pub questions: &'a str,
  pub subject: Option<&'a str>,
  pub difficulty: Option<Difficulty>,
  pub include_answers: Option<bool>,
}

/// Fill the configured worksheet template.
pub fn build_prompt(prompts: &Prompts, input: &PromptInput<'_>) -> String {
  fill_template(
    &prompts.worksheet_template,
    &[
      ("grade", input.grade),
      ("lesson", input.lesson),
      ("questions", input.questions),
    ],
  )
}
