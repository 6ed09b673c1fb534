//! Chart data shapes exchanged with the generator and the renderer.
//!
//! Bar and line charts share one shape (a label plus one number per
//! [`SeriesKey`]); pie charts carry a value and a color per row instead.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level array of data rows in a reply.
pub const ROWS_FIELD: &str = "rows";
/// Top-level array of series descriptors in a series reply.
pub const SERIES_KEYS_FIELD: &str = "seriesKeys";
/// Display label of a row.
pub const NAME_FIELD: &str = "name";
/// Magnitude of a pie slice.
pub const VALUE_FIELD: &str = "value";
/// Color of a pie slice.
pub const FILL_FIELD: &str = "fill";
/// Field name inside a series descriptor.
pub const KEY_FIELD: &str = "key";
/// Color inside a series descriptor.
pub const COLOR_FIELD: &str = "color";

/// A trimmed, non-empty chart topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

/// The topic was blank after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("missing topic: please enter a topic for the chart")]
pub struct EmptyTopic;

impl Topic {
    /// Create a topic from user input.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyTopic`] when the input is blank.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyTopic> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyTopic);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The topic text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Topic {
    type Err = EmptyTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The three supported chart kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Categorical: independent named slices, each with its own color.
    Pie,
    /// Series-XY: one x label per row, N numeric series drawn as bars.
    #[default]
    Bar,
    /// Series-Trend: same shape as [`ChartKind::Bar`], drawn as lines.
    Line,
}

/// Unknown chart kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart kind `{0}` (expected one of: bar, line, pie)")]
pub struct ParseChartKindError(pub String);

impl ChartKind {
    /// Every chart kind, in selector order.
    pub const ALL: [Self; 3] = [Self::Bar, Self::Line, Self::Pie];

    /// Returns `true` for the kinds that use series keys (bar and line).
    #[must_use]
    pub const fn is_series(&self) -> bool {
        matches!(self, Self::Bar | Self::Line)
    }

    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Bar => "bar",
            Self::Line => "line",
        }
    }

    /// Capitalised name used in prompts and captions.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Pie => "Pie",
            Self::Bar => "Bar",
            Self::Line => "Line",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ParseChartKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pie" | "categorical" => Ok(Self::Pie),
            "bar" | "series-xy" => Ok(Self::Bar),
            "line" | "series-trend" => Ok(Self::Line),
            other => Err(ParseChartKindError(other.to_owned())),
        }
    }
}

/// Names one numeric field of every row and the color to draw it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Field name present on every row.
    pub key: String,
    /// Display color token, usually a hex string.
    pub color: String,
}

impl SeriesKey {
    /// Create a series key.
    #[must_use]
    pub fn new(key: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            color: color.into(),
        }
    }
}

/// One data row.
///
/// Series rows keep one entry in `values` per series key. Pie rows keep their
/// magnitude under [`VALUE_FIELD`] and their color in `fill`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    /// Display label.
    pub name: String,
    /// Per-row color (pie rows only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Numeric fields keyed by field name.
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl DataRow {
    /// Create a series row.
    #[must_use]
    pub fn series<K, I>(name: impl Into<String>, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            name: name.into(),
            fill: None,
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Create a pie slice row.
    #[must_use]
    pub fn slice(name: impl Into<String>, value: f64, fill: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fill: Some(fill.into()),
            values: BTreeMap::from([(VALUE_FIELD.to_owned(), value)]),
        }
    }

    /// Value of a numeric field.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }
}

/// A validated generation reply.
///
/// Created fresh for every successful call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Data rows in reply order.
    pub rows: Vec<DataRow>,
    /// Series descriptors; `Some` for bar/line, `None` for pie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_keys: Option<Vec<SeriesKey>>,
}

impl GenerationResult {
    /// A pie result.
    #[must_use]
    pub const fn categorical(rows: Vec<DataRow>) -> Self {
        Self {
            rows,
            series_keys: None,
        }
    }

    /// A bar/line result.
    #[must_use]
    pub const fn series(rows: Vec<DataRow>, series_keys: Vec<SeriesKey>) -> Self {
        Self {
            rows,
            series_keys: Some(series_keys),
        }
    }

    /// Series descriptors, empty for pie results.
    #[must_use]
    pub fn series_keys(&self) -> &[SeriesKey] {
        self.series_keys.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn topic_is_trimmed() {
        let topic = Topic::new("  Monthly coffee sales \n").unwrap();
        assert_eq!(topic.as_str(), "Monthly coffee sales");
    }

    #[test]
    fn blank_topic_rejected() {
        assert_eq!(Topic::new(""), Err(EmptyTopic));
        assert_eq!(Topic::new("   \t"), Err(EmptyTopic));
        assert!(EmptyTopic.to_string().starts_with("missing topic"));
    }

    #[test]
    fn chart_kind_parse() {
        assert_eq!("bar".parse::<ChartKind>().unwrap(), ChartKind::Bar);
        assert_eq!("Line".parse::<ChartKind>().unwrap(), ChartKind::Line);
        assert_eq!(" PIE ".parse::<ChartKind>().unwrap(), ChartKind::Pie);
        assert_eq!("categorical".parse::<ChartKind>().unwrap(), ChartKind::Pie);
        assert_eq!("series-trend".parse::<ChartKind>().unwrap(), ChartKind::Line);
        assert!("donut".parse::<ChartKind>().is_err());
    }

    #[test]
    fn chart_kind_shapes() {
        assert!(ChartKind::Bar.is_series());
        assert!(ChartKind::Line.is_series());
        assert!(!ChartKind::Pie.is_series());
        assert_eq!(ChartKind::default(), ChartKind::Bar);
    }

    #[test]
    fn series_row_serializes_flat() {
        let row = DataRow::series("Jan", [("sales", 120.0)]);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Jan", "sales": 120.0}));
    }

    #[test]
    fn result_serializes_series_keys_camel_case() {
        let result = GenerationResult::series(
            vec![DataRow::series("Jan", [("sales", 1.0)])],
            vec![SeriesKey::new("sales", "#4f46e5")],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["seriesKeys"][0]["key"], "sales");

        let pie = GenerationResult::categorical(vec![DataRow::slice("A", 1.0, "#fff")]);
        let json = serde_json::to_value(&pie).unwrap();
        assert!(json.get("seriesKeys").is_none());
        assert_eq!(json["rows"][0]["fill"], "#fff");
        assert!(pie.series_keys().is_empty());
    }
}
