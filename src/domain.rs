//! Domain models: difficulty, the form catalog, and the structured worksheet shape.
//!
//! The generation path returns free text. `Worksheet` is the target shape for
//! structured output and is validated, rendered and exported, but never parsed
//! out of model text.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Allowed question counts offered by the form.
pub const QUESTION_COUNTS: [u32; 4] = [5, 10, 15, 20];
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

pub const SUBJECTS: [&str; 8] = [
  "اللغة العربية",
  "الرياضيات",
  "العلوم",
  "الدراسات الاجتماعية",
  "التربية الإسلامية",
  "اللغة الإنجليزية",
  "مهارات تقنية/حاسوب",
  "مهارات حياتية",
];

pub const GRADE_COUNT: u32 = 10;
pub const DEFAULT_GRADE: &str = "الصف 3";

/// Grade labels `الصف 1` .. `الصف 10`.
pub fn grades() -> Vec<String> {
  (1..=GRADE_COUNT).map(|i| format!("الصف {}", i)).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
  #[serde(rename = "سهل", alias = "easy")]
  Easy,
  #[default]
  #[serde(rename = "متوسط", alias = "medium")]
  Medium,
  #[serde(rename = "صعب", alias = "hard")]
  Hard,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

  pub fn label(self) -> &'static str {
    match self {
      Difficulty::Easy => "سهل",
      Difficulty::Medium => "متوسط",
      Difficulty::Hard => "صعب",
    }
  }

  /// Accepts the Arabic labels and the English names.
  pub fn from_label(s: &str) -> Option<Self> {
    match s.trim() {
      "سهل" | "easy" => Some(Difficulty::Easy),
      "متوسط" | "medium" => Some(Difficulty::Medium),
      "صعب" | "hard" => Some(Difficulty::Hard),
      _ => None,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
  #[serde(rename = "اختيار من متعدد", alias = "multiple-choice")]
  MultipleChoice,
  #[serde(rename = "صح أو خطأ", alias = "true-false")]
  TrueFalse,
  #[serde(rename = "أسئلة قصيرة", alias = "short-answer")]
  ShortAnswer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  #[serde(rename = "type")]
  pub kind: QuestionType,
  pub question: String,
  /// Present only for multiple-choice.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<Vec<String>>,
  /// Model answer, also for true/false and short answers.
  pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
  pub id: String,
  pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
  pub title: String,
  pub grade: String,
  pub subject: String,
  pub topic: String,
  pub questions: Vec<Question>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub answer_key: Option<Vec<AnswerKeyEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorksheetError {
  #[error("duplicate question id: {0}")]
  DuplicateId(String),
  #[error("multiple-choice question {0} has no options")]
  MissingOptions(String),
  #[error("question {0} is not multiple-choice but has options")]
  UnexpectedOptions(String),
  #[error("answer key references unknown question id: {0}")]
  UnknownAnswerId(String),
}

impl Worksheet {
  /// Check the structural invariants: unique ids, options iff multiple-choice,
  /// answer key only referencing known questions.
  pub fn validate(&self) -> Result<(), WorksheetError> {
    let mut seen = HashSet::new();
    for q in &self.questions {
      if !seen.insert(q.id.as_str()) {
        return Err(WorksheetError::DuplicateId(q.id.clone()));
      }
      match (q.kind, &q.options) {
        (QuestionType::MultipleChoice, None) => {
          return Err(WorksheetError::MissingOptions(q.id.clone()))
        }
        (QuestionType::MultipleChoice, Some(opts)) if opts.is_empty() => {
          return Err(WorksheetError::MissingOptions(q.id.clone()))
        }
        (QuestionType::TrueFalse | QuestionType::ShortAnswer, Some(_)) => {
          return Err(WorksheetError::UnexpectedOptions(q.id.clone()))
        }
        _ => {}
      }
    }
    if let Some(key) = &self.answer_key {
      if let Some(bad) = key.iter().find(|e| !seen.contains(e.id.as_str())) {
        return Err(WorksheetError::UnknownAnswerId(bad.id.clone()));
      }
    }
    Ok(())
  }

  /// Answer key in question order, built from each question's model answer.
  pub fn answer_key_from_questions(&self) -> Vec<AnswerKeyEntry> {
    self
      .questions
      .iter()
      .map(|q| AnswerKeyEntry { id: q.id.clone(), answer: q.answer.clone() })
      .collect()
  }

  /// Plain-text rendering used for preview and export.
  /// Options are lettered with Arabic letters; answers only when asked.
  pub fn render_lines(&self, show_answers: bool) -> Vec<String> {
    const LETTERS: [&str; 8] = ["أ", "ب", "ج", "د", "هـ", "و", "ز", "ح"];

    let mut out = vec![
      self.title.clone(),
      format!("الصف: {} | المادة: {} | الموضوع: {}", self.grade, self.subject, self.topic),
      String::new(),
    ];
    for (i, q) in self.questions.iter().enumerate() {
      out.push(format!("{}. {}", i + 1, q.question));
      if let Some(opts) = &q.options {
        for (j, opt) in opts.iter().enumerate() {
          let letter = LETTERS.get(j).copied().unwrap_or("-");
          out.push(format!("   {}) {}", letter, opt));
        }
      }
      if q.kind == QuestionType::TrueFalse {
        out.push("   ( صح )   ( خطأ )".to_string());
      }
    }

    if show_answers {
      let key = self.answer_key.clone().unwrap_or_else(|| self.answer_key_from_questions());
      out.push(String::new());
      out.push("مفتاح الإجابات".to_string());
      for entry in key {
        let n = self
          .questions
          .iter()
          .position(|q| q.id == entry.id)
          .map(|p| (p + 1).to_string())
          .unwrap_or(entry.id.clone());
        out.push(format!("{}. {}", n, entry.answer));
      }
    }
    out
  }
}
