//! Wire types for the OpenAI Responses API.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ============================================================================
// Request Types
// ============================================================================

/// Request body for `POST /responses`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesApiRequest {
    /// Model name.
    pub model: String,
    /// The rendered prompt.
    pub input: String,
    /// Output format configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,
    /// Output token limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
}

/// Text output configuration.
#[derive(Debug, Clone, Serialize)]
pub struct TextConfig {
    /// Requested output format.
    pub format: TextFormat,
}

/// Output format requested from the model.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextFormat {
    /// Plain text.
    Text,
    /// JSON conforming to a schema.
    JsonSchema {
        /// Schema name.
        name: String,
        /// The JSON schema.
        schema: JsonValue,
        /// Whether the provider must enforce the schema strictly.
        strict: bool,
    },
}

// ============================================================================
// Response Types
// ============================================================================

/// Response from the Responses API.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesApiResponse {
    /// Response ID.
    pub id: String,
    /// Model used.
    #[serde(default)]
    pub model: Option<String>,
    /// Output items.
    pub output: Vec<ResponseOutputItem>,
    /// Token usage.
    #[serde(default)]
    pub usage: Option<ResponseUsage>,
    /// Response status.
    pub status: ResponseStatus,
    /// Error if any.
    #[serde(default)]
    pub error: Option<ResponseError>,
    /// Why the response is incomplete.
    #[serde(default)]
    pub incomplete_details: Option<IncompleteDetails>,
}

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Response is complete.
    Completed,
    /// Response failed.
    Failed,
    /// Response was cancelled.
    Cancelled,
    /// Response is incomplete (truncated).
    Incomplete,
    /// Response is still being generated.
    InProgress,
    /// Response is queued.
    Queued,
}

/// Error in response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseError {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

/// Details for an incomplete response.
#[derive(Debug, Clone, Deserialize)]
pub struct IncompleteDetails {
    /// Reason, e.g. `max_output_tokens` or `content_filter`.
    pub reason: String,
}

/// Output item from the Responses API.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseOutputItem {
    /// Assistant message.
    Message {
        /// Message content items.
        #[serde(default)]
        content: Vec<MessageContentItem>,
    },
    /// Reasoning output.
    Reasoning {
        /// Reasoning summary.
        #[serde(default)]
        summary: Vec<ReasoningSummaryItem>,
    },
    /// Function call requested by the model.
    FunctionCall {
        /// Function name.
        name: String,
        /// JSON-encoded arguments.
        arguments: String,
    },
    /// Built-in tool calls and anything newer than this client.
    #[serde(other)]
    Other,
}

/// Reasoning summary item.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ReasoningSummaryItem {
    /// Summary text.
    #[serde(rename = "summary_text")]
    Text {
        /// The summary.
        text: String,
    },
}

/// Message content item.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum MessageContentItem {
    /// Generated text.
    #[serde(rename = "output_text")]
    Text {
        /// The text.
        text: String,
    },
    /// The model refused.
    #[serde(rename = "refusal")]
    Refusal {
        /// Refusal explanation.
        refusal: String,
    },
}

/// Token usage for Responses API.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseUsage {
    /// Input tokens.
    pub input_tokens: u64,
    /// Output tokens.
    pub output_tokens: u64,
    /// Total tokens.
    pub total_tokens: u64,
}

/// OpenAI API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIError {
    /// Error details.
    pub error: OpenAIErrorBody,
}

/// OpenAI error body.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorBody {
    /// Error message.
    pub message: String,
    /// Error type.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_schema_format_serialization() {
        let request = ResponsesApiRequest {
            model: "gpt-4o-mini".into(),
            input: "Add 1 and 2".into(),
            text: Some(TextConfig {
                format: TextFormat::JsonSchema {
                    name: "output".into(),
                    schema: json!({"type": "object"}),
                    strict: false,
                },
            }),
            max_output_tokens: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "input": "Add 1 and 2",
                "text": {"format": {"type": "json_schema", "name": "output", "schema": {"type": "object"}, "strict": false}}
            })
        );
    }

    #[test]
    fn test_unknown_output_items_are_tolerated() {
        let response: ResponsesApiResponse = serde_json::from_value(json!({
            "id": "resp_1",
            "status": "completed",
            "output": [
                {"type": "web_search_call", "id": "ws_1", "status": "completed"},
                {"type": "message", "content": [{"type": "output_text", "text": "hi", "annotations": []}]}
            ]
        }))
        .unwrap();

        assert_eq!(response.output.len(), 2);
        assert!(matches!(response.output[0], ResponseOutputItem::Other));
    }
}
