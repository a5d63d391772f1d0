//! Completion provider capability: given a prompt, return text or fail.
//!
//! The gateway holds an `Arc<dyn CompletionProvider>` so tests can swap in a
//! stub with no network access.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
  /// Connection, TLS or timeout failure before a response arrived.
  #[error("transport error: {0}")]
  Transport(String),
  /// Non-2xx answer; `message` is the provider's own error text when it sent one.
  #[error("provider HTTP {status}: {message}")]
  Status { status: u16, message: String },
  /// 2xx answer whose body could not be decoded.
  #[error("malformed provider response: {0}")]
  Decode(String),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
  /// Run one completion for a single user message. Missing content is `Ok("")`.
  async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

  /// Model identifier, for logs.
  fn model(&self) -> &str;
}
