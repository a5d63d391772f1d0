//! HTTP client for the generation gateway, used by the form model.

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use crate::protocol::{ErrorOut, GenerateIn, GenerateOut};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  /// The gateway answered with a non-2xx status; `error` is its message, if any.
  #[error("gateway HTTP {status}: {}", .error.as_deref().unwrap_or("<no message>"))]
  Api { status: u16, error: Option<String> },
  /// Network failure or unreadable response body.
  #[error("{0}")]
  Transport(String),
}

#[derive(Clone, Debug)]
pub struct GatewayClient {
  http: reqwest::Client,
  base_url: String,
}

impl GatewayClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self::with_client(reqwest::Client::new(), base_url)
  }

  pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self { http, base_url }
  }

  /// `POST /api/generate` once and decode either body shape.
  #[instrument(level = "debug", skip(self, body), fields(base_url = %self.base_url))]
  pub async fn generate(&self, body: &GenerateIn) -> Result<GenerateOut, ClientError> {
    let url = format!("{}/api/generate", self.base_url);
    let res = self.http.post(&url)
      .header(CONTENT_TYPE, "application/json")
      .json(body)
      .send().await
      .map_err(|e| ClientError::Transport(e.to_string()))?;

    let status = res.status();
    let bytes = res.bytes().await.map_err(|e| ClientError::Transport(e.to_string()))?;
    debug!(status = status.as_u16(), body_len = bytes.len(), "Gateway answered");

    if status.is_success() {
      serde_json::from_slice::<GenerateOut>(&bytes).map_err(|e| ClientError::Transport(e.to_string()))
    } else {
      let error = serde_json::from_slice::<ErrorOut>(&bytes).ok().map(|b| b.error);
      Err(ClientError::Api { status: status.as_u16(), error })
    }
  }
}
