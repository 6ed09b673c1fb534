//! OpenAI-compatible chat completions backend.
//!
//! Works against any endpoint that speaks the Chat Completions wire format
//! and accepts `response_format: json_schema`; point
//! [`OpenAIConfig::base_url`] elsewhere to use a compatible service.

mod chat;
mod client;
mod config;
mod types;

pub use client::OpenAI;
pub use config::OpenAIConfig;
