//! Mapping from a generation result onto drawable primitives.

use std::fmt;

use serde::Serialize;

use crate::chart::{ChartKind, GenerationResult, VALUE_FIELD};

use super::tooltip::format_entry;

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    /// Row label.
    pub name: String,
    /// Slice magnitude.
    pub value: f64,
    /// Color token from the row's `fill`.
    pub color: String,
    /// Share of the total, `0.0..=100.0`.
    pub percent: f64,
}

impl Slice {
    /// Slice caption, e.g. `"Chrome 65%"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {:.0}%", self.name, self.percent)
    }
}

/// One plotted series of a bar or line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Field name, shown in the legend and tooltips.
    pub key: String,
    /// Color token from the series key.
    pub color: String,
    /// One value per category; `None` where the row has no such field.
    pub values: Vec<Option<f64>>,
}

/// Categories along the x axis plus the series drawn over them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPlot {
    /// Row labels in row order.
    pub categories: Vec<String>,
    /// Series in `seriesKeys` order.
    pub series: Vec<Series>,
}

/// What the renderer draws for one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ChartPlan {
    /// Nothing to draw; shows a placeholder.
    Empty,
    /// Pie slices.
    Slices(Vec<Slice>),
    /// Grouped bars.
    Bars(SeriesPlot),
    /// One line per series.
    Lines(SeriesPlot),
}

/// Hover text for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    /// Row label.
    pub title: String,
    /// One `"label: value"` line per slice or series.
    pub entries: Vec<String>,
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)?;
        for entry in &self.entries {
            write!(f, "\n  {entry}")?;
        }
        Ok(())
    }
}

/// Map a result onto drawing primitives for `kind`.
#[must_use]
pub fn plan(kind: ChartKind, result: &GenerationResult) -> ChartPlan {
    if result.rows.is_empty() {
        return ChartPlan::Empty;
    }

    match kind {
        ChartKind::Pie => plan_slices(result),
        ChartKind::Bar => plan_series(result).map_or(ChartPlan::Empty, ChartPlan::Bars),
        ChartKind::Line => plan_series(result).map_or(ChartPlan::Empty, ChartPlan::Lines),
    }
}

fn plan_slices(result: &GenerationResult) -> ChartPlan {
    let values: Vec<f64> = result
        .rows
        .iter()
        .map(|row| row.value(VALUE_FIELD).unwrap_or_default())
        .collect();
    // Shares relative to the largest slice keep the total finite.
    let largest = values.iter().copied().fold(0.0_f64, f64::max);
    let share = |value: f64| {
        if largest > 0.0 {
            value.max(0.0) / largest
        } else {
            0.0
        }
    };
    let total: f64 = values.iter().map(|v| share(*v)).sum();

    let slices = result
        .rows
        .iter()
        .zip(values)
        .map(|(row, value)| Slice {
            name: row.name.clone(),
            value,
            color: row.fill.clone().unwrap_or_default(),
            percent: if total > 0.0 {
                share(value) / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    ChartPlan::Slices(slices)
}

fn plan_series(result: &GenerationResult) -> Option<SeriesPlot> {
    let keys = result.series_keys();
    if keys.is_empty() {
        return None;
    }

    let categories = result.rows.iter().map(|row| row.name.clone()).collect();
    let series = keys
        .iter()
        .map(|key| Series {
            key: key.key.clone(),
            color: key.color.clone(),
            values: result.rows.iter().map(|row| row.value(&key.key)).collect(),
        })
        .collect();

    Some(SeriesPlot { categories, series })
}

impl ChartPlan {
    /// Returns `true` for the placeholder plan.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Tooltip for every row, in row order.
    #[must_use]
    pub fn tooltips(&self) -> Vec<Tooltip> {
        match self {
            Self::Empty => Vec::new(),
            Self::Slices(slices) => slices
                .iter()
                .map(|slice| Tooltip {
                    title: slice.name.clone(),
                    entries: vec![format_entry(&slice.name, slice.value)],
                })
                .collect(),
            Self::Bars(plot) | Self::Lines(plot) => plot
                .categories
                .iter()
                .enumerate()
                .map(|(row, category)| Tooltip {
                    title: category.clone(),
                    entries: plot
                        .series
                        .iter()
                        .filter_map(|s| {
                            s.values
                                .get(row)
                                .copied()
                                .flatten()
                                .map(|v| format_entry(&s.key, v))
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
