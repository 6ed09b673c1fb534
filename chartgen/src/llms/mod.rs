//! Model backend implementations.
//!
//! # Available Backends
//!
//! - [`openai`] - OpenAI-compatible Chat Completions API
//! - [`mock`] - Scripted replies for tests and offline runs

mod error;
pub mod mock;
pub mod openai;

pub use error::LlmError;
pub use mock::{MockProvider, MockReply};
pub use openai::{OpenAI, OpenAIConfig};
