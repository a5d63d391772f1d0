//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Generation fields are kept as raw JSON values: the gateway only checks that
//! the required ones are present and truthy, and a wrongly typed optional
//! field is read as absent rather than failing the request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Difficulty, Worksheet};

/// Body of `POST /api/generate`. `lesson`/`topic` and `questions`/`count` are
/// alternative spellings sent by the two form variants.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_answers: Option<Value>,
}

/// Success body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerateOut {
    pub text: String,
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorOut {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Body of `POST /api/export`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExportIn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Value>,
    #[serde(default)]
    pub text: String,
}

/// Body of `POST /api/export/worksheet`: a structured worksheet to export.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportWorksheetIn {
    pub worksheet: Worksheet,
    #[serde(default)]
    pub show_answers: bool,
}

/// Form catalog served by `GET /api/options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsOut {
    pub grades: Vec<String>,
    pub subjects: Vec<String>,
    pub counts: Vec<u32>,
    pub difficulties: Vec<Difficulty>,
    pub defaults: FormDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefaults {
    pub grade: String,
    pub subject: String,
    pub count: u32,
    pub difficulty: Difficulty,
    pub include_answers: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthOut {
    pub ok: bool,
    pub provider: bool,
}

/// JavaScript-style truthiness rendered to the text that would be interpolated.
/// `null`, `false`, `0`, `""` and absent values yield None.
pub fn truthy_text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".into()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// First truthy value among alternative field spellings.
pub fn first_truthy(candidates: &[Option<&Value>]) -> Option<String> {
    candidates.iter().find_map(|v| truthy_text(*v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values_are_rejected() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert_eq!(truthy_text(Some(&v)), None, "{v} should be falsy");
        }
        assert_eq!(truthy_text(None), None);
    }

    #[test]
    fn truthy_values_render_literally() {
        assert_eq!(truthy_text(Some(&json!(10))).as_deref(), Some("10"));
        assert_eq!(truthy_text(Some(&json!("15"))).as_deref(), Some("15"));
        assert_eq!(truthy_text(Some(&json!(" "))).as_deref(), Some(" "));
        assert_eq!(truthy_text(Some(&json!("الصف 3"))).as_deref(), Some("الصف 3"));
    }

    #[test]
    fn first_truthy_prefers_earlier_spelling() {
        let lesson = json!("");
        let topic = json!("دورة الماء");
        assert_eq!(first_truthy(&[Some(&lesson), Some(&topic)]).as_deref(), Some("دورة الماء"));
        let lesson = json!("الكسور");
        assert_eq!(first_truthy(&[Some(&lesson), Some(&topic)]).as_deref(), Some("الكسور"));
    }

    #[test]
    fn generate_in_accepts_both_variants() {
        let minimal: GenerateIn =
            serde_json::from_value(json!({ "grade": "الصف 3", "lesson": "x", "questions": 10 })).expect("minimal");
        assert!(minimal.topic.is_none() && minimal.questions.is_some());

        let rich: GenerateIn = serde_json::from_value(json!({
            "grade": "الصف 3", "subject": "العلوم", "topic": "x", "count": 5,
            "difficulty": "متوسط", "includeAnswers": true
        }))
        .expect("rich");
        assert_eq!(rich.include_answers, Some(json!(true)));
        assert_eq!(rich.subject, Some(json!("العلوم")));
    }

    #[test]
    fn generate_in_tolerates_odd_optional_types() {
        let odd: GenerateIn = serde_json::from_value(json!({
            "grade": "g", "lesson": "l", "questions": 5,
            "subject": 3, "difficulty": ["hard"], "includeAnswers": "yes"
        }))
        .expect("odd optionals");
        assert_eq!(odd.include_answers, Some(json!("yes")));
    }

    #[test]
    fn error_out_omits_missing_details() {
        let v = serde_json::to_value(ErrorOut { error: "Missing required fields".into(), details: None }).expect("ser");
        assert_eq!(v, json!({ "error": "Missing required fields" }));
    }
}
