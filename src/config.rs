//! Runtime settings: environment variables plus an optional TOML file
//! (prompt template + generation parameters).
//!
//! See `Settings` and `FileConfig` for the expected schema.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// Original worksheet prompt. Placeholders: {grade}, {lesson}, {questions}.
pub const DEFAULT_WORKSHEET_TEMPLATE: &str = "
أنت معلم متخصص في مادة الهوية والمواطنة.
أنشئ ورقة عمل مناسبة للصف {grade}
بعنوان: {lesson}
عدد الأسئلة: {questions}

الشروط:
- لغة عربية مبسطة
- مناسبة لعمر الطلبة
- بدون كتابة الإجابات
- جاهزة للطباعة
";

/// Shape of the optional TOML file pointed to by WORKSHEET_CONFIG_PATH.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct FileConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub generation: GenerationCfg,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  #[serde(default = "default_worksheet_template")]
  pub worksheet_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self { worksheet_template: default_worksheet_template() }
  }
}

fn default_worksheet_template() -> String {
  DEFAULT_WORKSHEET_TEMPLATE.to_string()
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GenerationCfg {
  #[serde(default)]
  pub temperature: Option<f32>,
}

/// Completion-provider connection settings. `api_key` is the only secret.
#[derive(Clone)]
pub struct OpenAiSettings {
  pub api_key: Option<String>,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl std::fmt::Debug for OpenAiSettings {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OpenAiSettings")
      .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
      .field("base_url", &self.base_url)
      .field("model", &self.model)
      .field("temperature", &self.temperature)
      .finish()
  }
}

#[derive(Clone, Debug)]
pub struct Settings {
  pub port: u16,
  pub static_dir: PathBuf,
  pub openai: OpenAiSettings,
  pub prompts: Prompts,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      port: DEFAULT_PORT,
      static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
      openai: OpenAiSettings {
        api_key: None,
        base_url: DEFAULT_BASE_URL.to_string(),
        model: DEFAULT_MODEL.to_string(),
        temperature: DEFAULT_TEMPERATURE,
      },
      prompts: Prompts::default(),
    }
  }
}

impl Settings {
  /// Read everything from the process environment once, at startup.
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Same as `from_env` but with an injectable variable source.
  pub fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    let file_cfg = lookup("WORKSHEET_CONFIG_PATH")
      .and_then(|path| load_file_config(&path))
      .unwrap_or_default();

    let port = lookup("PORT")
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(DEFAULT_PORT);

    let api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());

    Self {
      port,
      static_dir: lookup("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
      openai: OpenAiSettings {
        api_key,
        base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
        model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
        temperature: file_cfg.generation.temperature.unwrap_or(DEFAULT_TEMPERATURE),
      },
      prompts: file_cfg.prompts,
    }
  }
}

/// Attempt to load `FileConfig` from a path. On any parsing/IO error, returns None.
pub fn load_file_config(path: &str) -> Option<FileConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match toml::from_str::<FileConfig>(&s) {
      Ok(cfg) => {
        info!(target: "worksheet_backend", %path, "Loaded worksheet config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "worksheet_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "worksheet_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
