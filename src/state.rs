//! Application state: settings, prompts and the optional completion provider.
//!
//! The state is immutable after startup and shared behind `Arc`. The provider
//! is only present when an API key was configured; the gateway turns its
//! absence into a configuration error.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::config::{Prompts, Settings};
use crate::openai::OpenAI;
use crate::provider::CompletionProvider;

#[derive(Clone)]
pub struct AppState {
    pub prompts: Prompts,
    pub provider: Option<Arc<dyn CompletionProvider>>,
}

impl AppState {
    /// Build state from settings: prompts plus an OpenAI client when a key is present.
    #[instrument(level = "info", skip_all)]
    pub fn from_settings(settings: &Settings) -> Self {
        let provider: Option<Arc<dyn CompletionProvider>> = match OpenAI::from_settings(&settings.openai) {
            Ok(Some(oa)) => {
                info!(target: "worksheet_backend", base_url = %oa.base_url, model = %oa.model, temperature = oa.temperature, "OpenAI enabled.");
                Some(Arc::new(oa))
            }
            Ok(None) => {
                warn!(target: "worksheet_backend", "OPENAI_API_KEY not set; /api/generate will answer 500 until configured.");
                None
            }
            Err(e) => {
                error!(target: "worksheet_backend", error = %e, "OPENAI_API_KEY is set but the OpenAI client could not be built; /api/generate will answer 500.");
                None
            }
        };
        Self { prompts: settings.prompts.clone(), provider }
    }

    /// State with an explicit provider (or none). Used to inject stubs.
    pub fn with_provider(prompts: Prompts, provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { prompts, provider }
    }

    pub fn provider_configured(&self) -> bool {
        self.provider.is_some()
    }
}
