//! Chart rendering.
//!
//! Rendering is split in two steps: [`plan`] maps a validated result onto
//! drawing primitives, and [`render_svg`] draws a plan with `plotters`.
//! Tooltip text comes from [`tooltip`] so every chart kind formats numbers
//! the same way.

mod plan;
mod svg;
pub mod tooltip;

pub use plan::{ChartPlan, Series, SeriesPlot, Slice, Tooltip, plan};
pub use svg::{EMPTY_PLACEHOLDER, RenderOptions, parse_color, render_svg};

use crate::chart::{ChartKind, GenerationResult};
use crate::error::Result;

/// Plan and render `result` as `kind` in one step.
///
/// # Errors
///
/// Returns [`Error::Render`](crate::Error::Render) when drawing fails.
pub fn render(kind: ChartKind, result: &GenerationResult, options: &RenderOptions) -> Result<String> {
    render_svg(&plan(kind, result), options)
}
