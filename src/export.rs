//! Word-processor export of generated worksheets.
//!
//! The document is Word-flavoured HTML served as `application/msword`, which
//! Word and LibreOffice open as a regular document. Layout is right-to-left:
//! title, metadata lines, then one paragraph per non-empty text line.

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::domain::{Worksheet, WorksheetError};
use crate::protocol::{first_truthy, ErrorOut, ExportIn};
use crate::util::escape_html;

pub const MAX_FILENAME_CHARS: usize = 80;
pub const FALLBACK_FILENAME: &str = "worksheet";
pub const DOC_EXTENSION: &str = "doc";
pub const DOC_CONTENT_TYPE: &str = "application/msword; charset=utf-8";
pub const DEFAULT_TITLE: &str = "ورقة عمل";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
  #[error("invalid export body: {0}")]
  InvalidBody(String),
  #[error("invalid worksheet: {0}")]
  InvalidWorksheet(#[from] WorksheetError),
}

impl IntoResponse for ExportError {
  fn into_response(self) -> axum::response::Response {
    let error = match &self {
      ExportError::InvalidBody(_) => "invalid_body",
      ExportError::InvalidWorksheet(_) => "invalid_worksheet",
    };
    let body = ErrorOut { error: error.into(), details: Some(self.to_string()) };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
  }
}

const FORBIDDEN: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replace each forbidden filesystem character with `-`, drop control
/// characters, trim, and cap at `MAX_FILENAME_CHARS` characters.
pub fn sanitize_filename(raw: &str) -> String {
  let replaced: String = raw
    .chars()
    .filter(|c| !c.is_control())
    .map(|c| if FORBIDDEN.contains(&c) { '-' } else { c })
    .collect();
  let capped: String = replaced.trim().chars().take(MAX_FILENAME_CHARS).collect();
  let capped = capped.trim_end().to_string();
  if capped.is_empty() { FALLBACK_FILENAME.to_string() } else { capped }
}

/// `Content-Disposition` value with an ASCII fallback and an RFC 5987 UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
  let ascii: String = filename
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') { c } else { '_' })
    .collect();
  format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", ascii, percent_encode(filename))
}

fn percent_encode(s: &str) -> String {
  let mut out = String::with_capacity(s.len() * 3);
  for b in s.bytes() {
    if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
      out.push(b as char);
    } else {
      out.push_str(&format!("%{:02X}", b));
    }
  }
  out
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
  pub title: String,
  pub metadata: Vec<String>,
  pub paragraphs: Vec<String>,
  /// Base name without extension, already sanitized.
  pub filename: String,
}

impl ExportDocument {
  /// Build from the form's export request: generated text plus grade/lesson/count.
  pub fn from_request(req: &ExportIn) -> Self {
    let title = req
      .title
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .unwrap_or(DEFAULT_TITLE)
      .to_string();
    let lesson = first_truthy(&[req.lesson.as_ref(), req.topic.as_ref()]);
    let mut metadata = Vec::new();
    if let Some(grade) = first_truthy(&[req.grade.as_ref()]) {
      metadata.push(format!("الصف: {}", grade));
    }
    if let Some(lesson) = &lesson {
      metadata.push(format!("الدرس: {}", lesson));
    }
    if let Some(count) = first_truthy(&[req.questions.as_ref(), req.count.as_ref()]) {
      metadata.push(format!("عدد الأسئلة: {}", count));
    }
    let filename = match &lesson {
      Some(l) => sanitize_filename(&format!("{} - {}", title, l)),
      None => sanitize_filename(&title),
    };
    Self { title, metadata, paragraphs: split_paragraphs(&req.text), filename }
  }

  /// Build from a structured worksheet.
  pub fn from_worksheet(ws: &Worksheet, show_answers: bool) -> Self {
    let mut lines = ws.render_lines(show_answers).into_iter();
    let title = lines.next().unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let metadata: Vec<String> = lines.next().into_iter().collect();
    let paragraphs = lines.filter(|l| !l.trim().is_empty()).collect();
    Self {
      filename: sanitize_filename(&format!("{} - {}", title, ws.topic)),
      title,
      metadata,
      paragraphs,
    }
  }

  pub fn file_name(&self) -> String {
    format!("{}.{}", self.filename, DOC_EXTENSION)
  }

  /// Render as Word HTML.
  pub fn render(&self) -> String {
    let mut html = String::new();
    html.push_str("<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" xmlns:w=\"urn:schemas-microsoft-com:office:word\" xmlns=\"http://www.w3.org/TR/REC-html40\" lang=\"ar\" dir=\"rtl\">\n");
    html.push_str("<head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{}</title>", escape_html(&self.title)));
    html.push_str("<style>body{font-family:'Arial';direction:rtl;text-align:right;font-size:14pt}h1{text-align:center;font-size:20pt}p.meta{color:#334155;margin:2pt 0}p{margin:6pt 0}</style>");
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title)));
    for m in &self.metadata {
      html.push_str(&format!("<p class=\"meta\">{}</p>\n", escape_html(m)));
    }
    if !self.metadata.is_empty() {
      html.push_str("<hr>\n");
    }
    for p in &self.paragraphs {
      html.push_str(&format!("<p>{}</p>\n", escape_html(p)));
    }
    html.push_str("</body>\n</html>\n");
    html
  }
}

fn split_paragraphs(text: &str) -> Vec<String> {
  text
    .lines()
    .map(|l| l.trim_end())
    .filter(|l| !l.trim().is_empty())
    .map(str::to_string)
    .collect()
}
