//! Core model trait and types.
//!
//! A [`Model`] turns one rendered prompt into one [`Generation`]. It is called
//! exactly once per prompt function call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prompt_fn_core::{ContentPart, ExtractionError, FinishReason, Usage};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::error::ModelError;

/// A single generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The rendered prompt.
    pub prompt: String,
    /// JSON schema of the expected structured output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<JsonValue>,
    /// How many times the backend may retry on its own.
    pub max_retries: u32,
}

impl GenerationRequest {
    /// Create a request for a prompt with no output schema and no retries.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            output_schema: None,
            max_retries: 0,
        }
    }

    /// Set the target output schema.
    #[must_use]
    pub fn with_output_schema(mut self, schema: Option<JsonValue>) -> Self {
        self.output_schema = schema;
        self
    }

    /// Set the backend retry budget.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Result of a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Raw content parts, in emission order.
    pub content: Vec<ContentPart>,
    /// Structured output decoded by the backend, if it produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<JsonValue>,
    /// Why generation stopped.
    pub finish_reason: FinishReason,
    /// Token usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Model that produced the generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// When the generation was received.
    pub timestamp: DateTime<Utc>,
}

impl Generation {
    /// Create a generation without structured output.
    #[must_use]
    pub fn new(content: Vec<ContentPart>, finish_reason: FinishReason) -> Self {
        Self {
            content,
            structured_output: None,
            finish_reason,
            usage: None,
            model_name: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a generation and derive its structured output from the text.
    ///
    /// Structured output is only present when generation stopped normally and
    /// the concatenated text parts form a JSON document. Truncated or filtered
    /// generations never carry it.
    #[must_use]
    pub fn from_content(content: Vec<ContentPart>, finish_reason: FinishReason) -> Self {
        let mut generation = Self::new(content, finish_reason);
        if finish_reason.is_complete() {
            generation.structured_output = serde_json::from_str(generation.text().trim()).ok();
        }
        generation
    }

    /// Set the structured output.
    #[must_use]
    pub fn with_structured_output(mut self, output: JsonValue) -> Self {
        self.structured_output = Some(output);
        self
    }

    /// Set usage.
    #[must_use]
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Concatenated text parts (reasoning excluded).
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|part| part.is_text())
            .filter_map(ContentPart::as_text)
            .collect()
    }

    /// Read the structured output.
    pub fn output(&self) -> Result<&JsonValue, ExtractionError> {
        self.structured_output
            .as_ref()
            .ok_or(ExtractionError::NoOutput {
                finish_reason: self.finish_reason,
            })
    }
}

/// Generation backend.
///
/// Implementations must not retry on their own beyond
/// [`GenerationRequest::max_retries`].
#[async_trait]
pub trait Model: Send + Sync {
    /// Get the model name.
    fn name(&self) -> &str;

    /// Get the model system/provider (openai, ollama, mock).
    fn system(&self) -> &str;

    /// Get the full model identifier.
    fn identifier(&self) -> String {
        format!("{}:{}", self.system(), self.name())
    }

    /// Generate content for a request.
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ModelError>;
}

/// Boxed model for dynamic dispatch.
pub type BoxedModel = Arc<dyn Model>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("hello")
            .with_output_schema(Some(json!({"type": "object"})))
            .with_max_retries(2);
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.max_retries, 2);
        assert!(request.output_schema.is_some());
    }

    #[test]
    fn test_from_content_derives_output_on_stop() {
        let generation = Generation::from_content(
            vec![ContentPart::reasoning("thinking"), ContentPart::text(r#"{"result": 42}"#)],
            FinishReason::Stop,
        );
        assert_eq!(generation.output().unwrap(), &json!({"result": 42}));
    }

    #[test]
    fn test_from_content_without_output_when_truncated() {
        let generation =
            Generation::from_content(vec![ContentPart::text(r#"{"result": 42}"#)], FinishReason::Length);
        let err = generation.output().unwrap_err();
        assert_eq!(
            err,
            ExtractionError::NoOutput {
                finish_reason: FinishReason::Length
            }
        );
    }

    #[test]
    fn test_from_content_without_output_for_free_text() {
        let generation = Generation::from_content(vec![ContentPart::text("Sure! Here it is")], FinishReason::Stop);
        assert!(generation.structured_output.is_none());
        assert_eq!(generation.text(), "Sure! Here it is");
    }

    #[test]
    fn test_text_concatenates_without_separator() {
        let generation = Generation::new(
            vec![ContentPart::text("{\"a\":"), ContentPart::text("1}")],
            FinishReason::Stop,
        )
        .with_model_name("m")
        .with_usage(Usage::with_tokens(3, 4));
        assert_eq!(generation.text(), "{\"a\":1}");
        assert_eq!(generation.usage.unwrap().total_tokens, Some(7));
    }
}
