//! Minimal OpenAI chat-completions client for worksheet generation.
//!
//! One call shape only: a single user message, fixed model and temperature,
//! plain text back. Calls are instrumented and log model, latency and response
//! size (not contents).
//!
//! NOTE: the API key is never logged.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::OpenAiSettings;
use crate::provider::{CompletionProvider, ProviderError};
use crate::util::trunc_for_log;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl OpenAI {
  /// Build the client if the settings carry an API key; `Ok(None)` without one.
  /// No request timeout is configured: the call lasts as long as the provider takes.
  pub fn from_settings(settings: &OpenAiSettings) -> Result<Option<Self>, ProviderError> {
    let Some(api_key) = settings.api_key.clone() else {
      return Ok(None);
    };
    let client = reqwest::Client::builder()
      .build()
      .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {}", e)))?;
    Ok(Some(Self {
      client,
      api_key,
      base_url: settings.base_url.trim_end_matches('/').to_string(),
      model: settings.model.clone(),
      temperature: settings.temperature,
    }))
  }

  /// Plain-text chat completion with the prompt as the only (user) message.
  /// The first choice's content is returned untouched; no choices or null content yield "".
  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn chat_plain(&self, prompt: &str) -> Result<String, ProviderError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![ChatMessageReq { role: "user".into(), content: prompt.into() }],
      temperature: self.temperature,
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "worksheet-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await
      .map_err(|e| ProviderError::Transport(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or_else(|| trunc_for_log(&body, 300));
      error!(elapsed = ?start.elapsed(), status = status.as_u16(), %message, "OpenAI call rejected");
      return Err(ProviderError::Status { status: status.as_u16(), message });
    }

    let body: ChatCompletionResponse = res.json().await
      .map_err(|e| ProviderError::Decode(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }

    let text = first_choice_text(body);
    info!(elapsed = ?start.elapsed(), text_len = text.len(), "OpenAI response received");
    Ok(text)
  }
}

#[async_trait]
impl CompletionProvider for OpenAI {
  async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
    self.chat_plain(prompt).await
  }

  fn model(&self) -> &str {
    &self.model
  }
}

fn first_choice_text(body: ChatCompletionResponse) -> String {
  body.choices.into_iter().next()
    .and_then(|c| c.message)
    .and_then(|m| m.content)
    .unwrap_or_default()
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  #[serde(default)] choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { #[serde(default)] message: Option<ChatMessageResp> }
#[derive(Deserialize)]
struct ChatMessageResp { #[serde(default)] content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
