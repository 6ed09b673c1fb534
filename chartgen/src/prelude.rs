//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits for easy access.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chartgen::prelude::*;
//! ```

pub use crate::llms::{MockProvider, MockReply, OpenAI, OpenAIConfig};

pub use crate::chart::{
    ChartKind, DataRow, EmptyTopic, GenerationResult, ParseChartKindError, SeriesKey, Topic,
};
pub use crate::chat::{
    ChatProvider, ChatRequest, ChatResponse, JsonSchemaSpec, ResponseFormat, SharedChatProvider,
    StopReason,
};
pub use crate::controller::{Attempt, ChartController, ChartState, SubmitRejected};
pub use crate::error::{Error, GenerationError, LlmError, Result};
pub use crate::generation::{ChartGenerator, parse_reply, validate_reply};
pub use crate::message::{Message, Role};
pub use crate::render::{ChartPlan, RenderOptions, Tooltip, plan, render, render_svg};
pub use crate::request::{ChartRequest, build};
pub use crate::usage::Usage;
