//! Worksheet generator backend.
//!
//! - Axum HTTP API: `/api/generate`, `/api/export`, `/api/options`, `/api/health`
//! - OpenAI chat-completions behind the `CompletionProvider` trait
//! - Static page (./static/index.html) with print-to-PDF stylesheet
//! - Form model + gateway client for driving the API from Rust

pub mod client;
pub mod config;
pub mod domain;
pub mod export;
pub mod form;
pub mod gateway;
pub mod openai;
pub mod prompt;
pub mod protocol;
pub mod provider;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod util;
