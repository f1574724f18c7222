//! Content returned by generation backends.
//!
//! A generation is an ordered list of [`ContentPart`]s. Only some parts carry
//! text; the order is the order in which the backend emitted them.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single part of generated content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain generated text.
    Text {
        /// The text content.
        text: String,
    },
    /// Reasoning or thinking text emitted alongside the answer.
    Reasoning {
        /// The reasoning text.
        text: String,
    },
    /// A tool call requested by the model.
    ToolCall {
        /// Name of the tool.
        tool_name: String,
        /// Tool arguments.
        input: JsonValue,
    },
}

impl ContentPart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a reasoning part.
    pub fn reasoning(text: impl Into<String>) -> Self {
        Self::Reasoning { text: text.into() }
    }

    /// Create a tool call part.
    pub fn tool_call(tool_name: impl Into<String>, input: JsonValue) -> Self {
        Self::ToolCall {
            tool_name: tool_name.into(),
            input,
        }
    }

    /// Text carried by this part, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } | Self::Reasoning { text } => Some(text),
            Self::ToolCall { .. } => None,
        }
    }

    /// Part kind as it appears on the wire.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Reasoning { .. } => "reasoning",
            Self::ToolCall { .. } => "tool_call",
        }
    }

    /// Whether this is a plain text part.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }
}

/// Reason why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of response.
    Stop,
    /// Maximum tokens reached.
    Length,
    /// Content was filtered.
    ContentFilter,
    /// Model wants to call tools.
    ToolCall,
    /// An error occurred.
    Error,
    /// Reason not reported by the backend.
    Unknown,
}

impl FinishReason {
    /// Check if this indicates the response is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Stop)
    }

    /// Check if this indicates truncation.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Length)
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
            Self::Length => write!(f, "length"),
            Self::ContentFilter => write!(f, "content_filter"),
            Self::ToolCall => write!(f, "tool_call"),
            Self::Error => write!(f, "error"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Token usage for a single generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    /// Tokens in the completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    /// Total tokens (input + output).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl Usage {
    /// Create usage with input and output tokens.
    #[must_use]
    pub fn with_tokens(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
            total_tokens: Some(input_tokens + output_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_text_is_exposed_for_text_and_reasoning() {
        assert_eq!(ContentPart::text("a").as_text(), Some("a"));
        assert_eq!(ContentPart::reasoning("b").as_text(), Some("b"));
        assert_eq!(ContentPart::tool_call("search", json!({})).as_text(), None);
    }

    #[test]
    fn test_content_part_serialization() {
        let part = ContentPart::text("hello");
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hello"}));

        let parsed: ContentPart =
            serde_json::from_value(json!({"type": "tool_call", "tool_name": "t", "input": {"x": 1}}))
                .unwrap();
        assert_eq!(parsed.kind(), "tool_call");
    }

    #[test]
    fn test_finish_reason() {
        assert!(FinishReason::Stop.is_complete());
        assert!(!FinishReason::Length.is_complete());
        assert!(FinishReason::Length.is_truncated());
        assert_eq!(FinishReason::ContentFilter.to_string(), "content_filter");
    }

    #[test]
    fn test_usage_with_tokens() {
        let usage = Usage::with_tokens(10, 5);
        assert_eq!(usage.total_tokens, Some(15));
    }
}
