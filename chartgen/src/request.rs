//! Prompt and schema construction per chart kind.
//!
//! Series field names are chosen by the model, so the series schema leaves
//! row properties open and asks for an explicit `seriesKeys` list naming the
//! fields to plot.

use serde::Serialize;
use serde_json::{Value, json};

use crate::chart::{
    COLOR_FIELD, ChartKind, FILL_FIELD, KEY_FIELD, NAME_FIELD, ROWS_FIELD, SERIES_KEYS_FIELD,
    Topic, VALUE_FIELD,
};
use crate::chat::{ChatRequest, JsonSchemaSpec, ResponseFormat};

/// Minimum number of rows asked for in series charts.
pub const MIN_SERIES_ROWS: usize = 5;

/// Instruction text plus the structured-output schema for one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRequest {
    /// Natural-language instruction sent as the user message.
    pub instruction: String,
    /// Schema the endpoint is asked to follow.
    pub schema: JsonSchemaSpec,
}

impl ChartRequest {
    /// Convert into a chat request for `model`.
    #[must_use]
    pub fn into_chat_request(self, model: impl Into<String>) -> ChatRequest {
        ChatRequest::new(model)
            .user(self.instruction)
            .response_format(ResponseFormat::json_schema(self.schema))
    }
}

/// Build the instruction and schema for `topic` rendered as `kind`.
#[must_use]
pub fn build(topic: &Topic, kind: ChartKind) -> ChartRequest {
    let (instruction, schema) = if kind.is_series() {
        (series_instruction(topic, kind), series_schema(kind))
    } else {
        (categorical_instruction(topic), categorical_schema())
    };

    ChartRequest {
        instruction,
        schema: JsonSchemaSpec::new(format!("chart_data_{}", kind.as_str()), schema),
    }
}

fn categorical_instruction(topic: &Topic) -> String {
    format!(
        "Generate sample JSON data for a Pie chart about \"{topic}\". \
         The data should be an array of objects. Each object must have a \"{NAME_FIELD}\" \
         property (string) for the label, a \"{VALUE_FIELD}\" property (number), and a \
         \"{FILL_FIELD}\" property (a unique, vibrant hex color string). \
         Provide a JSON object with a single key \"{ROWS_FIELD}\" containing this array."
    )
}

fn series_instruction(topic: &Topic, kind: ChartKind) -> String {
    format!(
        "Generate sample JSON data for a {chart} chart about \"{topic}\". \
         The response must be a JSON object with two keys: \"{ROWS_FIELD}\" and \"{SERIES_KEYS_FIELD}\".\n\
         1. \"{ROWS_FIELD}\": An array of at least {MIN_SERIES_ROWS} objects. Each object must have a \
         string \"{NAME_FIELD}\" property for the x-axis label, and one or two other numeric \
         properties for the y-axis values (e.g., \"sales\", \"users\"). The key names for these \
         numeric properties must be consistent across all objects.\n\
         2. \"{SERIES_KEYS_FIELD}\": An array of objects describing the numeric properties. Each \
         object must have a \"{KEY_FIELD}\" (string, matching a numeric key in the \
         \"{ROWS_FIELD}\" objects) and a \"{COLOR_FIELD}\" (a unique, vibrant hex color string).",
        chart = kind.display_name(),
    )
}

fn categorical_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            ROWS_FIELD: {
                "type": "array",
                "description": "An array of data points for the pie chart.",
                "items": {
                    "type": "object",
                    "properties": {
                        NAME_FIELD: { "type": "string", "description": "The label for the slice." },
                        VALUE_FIELD: { "type": "number", "description": "The numerical value of the slice." },
                        FILL_FIELD: { "type": "string", "description": "The hex color for the slice." }
                    },
                    "required": [NAME_FIELD, VALUE_FIELD, FILL_FIELD]
                }
            }
        },
        "required": [ROWS_FIELD]
    })
}

fn series_schema(kind: ChartKind) -> Value {
    json!({
        "type": "object",
        "properties": {
            ROWS_FIELD: {
                "type": "array",
                "description": format!("An array of data points for the {} chart.", kind.display_name()),
                "items": {
                    "type": "object",
                    "properties": {
                        NAME_FIELD: { "type": "string", "description": "The label for the x-axis." }
                    },
                    "required": [NAME_FIELD]
                }
            },
            SERIES_KEYS_FIELD: {
                "type": "array",
                "description": "An array of objects describing the data keys and their colors.",
                "items": {
                    "type": "object",
                    "properties": {
                        KEY_FIELD: { "type": "string", "description": "The key for the data value." },
                        COLOR_FIELD: { "type": "string", "description": "The hex color for this data series." }
                    },
                    "required": [KEY_FIELD, COLOR_FIELD]
                }
            }
        },
        "required": [ROWS_FIELD, SERIES_KEYS_FIELD]
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chat::ResponseFormat;

    fn required(value: &Value) -> Vec<&str> {
        value["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    fn topic() -> Topic {
        Topic::new("Monthly coffee sales").unwrap()
    }

    #[test]
    fn pie_schema_requires_name_value_fill() {
        let request = build(&topic(), ChartKind::Pie);
        let schema = &request.schema.schema;

        assert_eq!(required(schema), vec!["rows"]);
        assert_eq!(schema["properties"]["rows"]["type"], "array");
        assert_eq!(
            required(&schema["properties"]["rows"]["items"]),
            vec!["name", "value", "fill"]
        );
        assert!(schema["properties"].get("seriesKeys").is_none());
        assert_eq!(request.schema.name, "chart_data_pie");
    }

    #[test]
    fn series_schema_requires_rows_and_series_keys() {
        for kind in [ChartKind::Bar, ChartKind::Line] {
            let request = build(&topic(), kind);
            let schema = &request.schema.schema;

            assert_eq!(required(schema), vec!["rows", "seriesKeys"]);
            assert_eq!(required(&schema["properties"]["rows"]["items"]), vec!["name"]);
            assert_eq!(
                required(&schema["properties"]["seriesKeys"]["items"]),
                vec!["key", "color"]
            );
            assert!(request.schema.strict.is_none());
        }
    }

    #[test]
    fn instruction_mentions_topic_and_kind() {
        let bar = build(&topic(), ChartKind::Bar);
        assert!(bar.instruction.contains("\"Monthly coffee sales\""));
        assert!(bar.instruction.contains("a Bar chart"));
        assert!(bar.instruction.contains("at least 5 objects"));

        let line = build(&topic(), ChartKind::Line);
        assert!(line.instruction.contains("a Line chart"));

        let pie = build(&topic(), ChartKind::Pie);
        assert!(pie.instruction.contains("Pie chart"));
        assert!(pie.instruction.contains("\"fill\""));
    }

    #[test]
    fn build_is_deterministic() {
        for kind in ChartKind::ALL {
            assert_eq!(build(&topic(), kind), build(&topic(), kind));
        }
    }

    #[test]
    fn into_chat_request_carries_schema() {
        let chat = build(&topic(), ChartKind::Line).into_chat_request("gpt-4o-mini");
        assert_eq!(chat.model, "gpt-4o-mini");
        assert_eq!(chat.messages.len(), 1);
        assert!(matches!(
            chat.response_format,
            Some(ResponseFormat::JsonSchema { ref json_schema }) if json_schema.name == "chart_data_line"
        ));
    }
}
