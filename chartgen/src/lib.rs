//! Chartgen - AI-generated chart data and SVG rendering
//!
//! This crate asks a structured-output language model for sample chart data
//! about a topic, validates the reply against the shape the chosen chart kind
//! needs, and renders the result with `plotters`.

pub mod chart;
pub mod chat;
pub mod controller;
pub mod error;
pub mod generation;
pub mod llms;
pub mod message;
pub mod prelude;
pub mod render;
pub mod request;
pub mod usage;

pub use error::{Error, GenerationError, LlmError, Result};
