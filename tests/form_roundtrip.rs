//! End-to-end: form model -> gateway client -> real listener -> stub provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use worksheet_backend::client::{ClientError, GatewayClient};
use worksheet_backend::config::Prompts;
use worksheet_backend::form::WorksheetForm;
use worksheet_backend::protocol::GenerateIn;
use worksheet_backend::provider::{CompletionProvider, ProviderError};
use worksheet_backend::routes::api_router;
use worksheet_backend::state::AppState;

struct EchoTopic {
  calls: AtomicUsize,
}

#[async_trait]
impl CompletionProvider for EchoTopic {
  async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let title = prompt
      .lines()
      .find_map(|l| l.strip_prefix("بعنوان: "))
      .unwrap_or_default();
    Ok(format!("ورقة عمل: {}\nسؤال 1...", title))
  }

  fn model(&self) -> &str {
    "echo"
  }
}

async fn serve(provider: Option<Arc<dyn CompletionProvider>>) -> String {
  let app = api_router(Arc::new(AppState::with_provider(Prompts::default(), provider)));
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
  let addr = listener.local_addr().expect("addr");
  tokio::spawn(async move {
    let _ = axum::serve(listener, app).await;
  });
  format!("http://{}", addr)
}

#[tokio::test]
async fn form_generates_through_the_gateway() {
  let provider = Arc::new(EchoTopic { calls: AtomicUsize::new(0) });
  let base = serve(Some(provider.clone())).await;
  let client = GatewayClient::new(base);

  let mut form = WorksheetForm::default();
  form.topic = "دورة الماء".into();
  assert!(form.generate(&client).await);

  assert!(!form.loading());
  assert_eq!(form.error(), "");
  assert_eq!(form.text(), Some("ورقة عمل: دورة الماء\nسؤال 1..."));
  assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn form_does_not_send_with_a_short_topic() {
  let provider = Arc::new(EchoTopic { calls: AtomicUsize::new(0) });
  let base = serve(Some(provider.clone())).await;
  let client = GatewayClient::new(base);

  let mut form = WorksheetForm::default();
  form.topic = " م ".into();
  assert!(!form.generate(&client).await);
  assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn form_shows_the_gateway_error_message() {
  let base = serve(None).await;
  let client = GatewayClient::new(base);

  let mut form = WorksheetForm::default();
  form.topic = "الكسور".into();
  assert!(form.generate(&client).await);
  assert!(!form.loading());
  assert_eq!(form.error(), "OPENAI_API_KEY not set");
  assert_eq!(form.text(), None);
}

#[tokio::test]
async fn client_reports_400_for_incomplete_requests() {
  let provider = Arc::new(EchoTopic { calls: AtomicUsize::new(0) });
  let base = serve(Some(provider.clone())).await;
  let client = GatewayClient::new(format!("{}/", base));

  let body = GenerateIn { grade: Some("الصف 2".into()), ..Default::default() };
  match client.generate(&body).await {
    Err(ClientError::Api { status, error }) => {
      assert_eq!(status, 400);
      assert_eq!(error.as_deref(), Some("Missing required fields"));
    }
    other => panic!("unexpected outcome: {other:?}"),
  }
  assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_gateway_surfaces_a_transport_error() {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
  let addr = listener.local_addr().expect("addr");
  drop(listener);
  let client = GatewayClient::new(format!("http://{}", addr));

  let mut form = WorksheetForm::default();
  form.topic = "الكسور".into();
  assert!(form.generate(&client).await);
  assert!(!form.loading());
  assert!(!form.error().is_empty());
}
