//! Mock and function-based models for testing.
//!
//! - [`MockModel`]: a queue of pre-configured results
//! - [`FunctionModel`]: results computed from the request
//!
//! # Examples
//!
//! ```rust
//! use prompt_fn_models::{FunctionModel, Generation, MockModel};
//! use prompt_fn_core::{ContentPart, FinishReason};
//!
//! let model = MockModel::new("test")
//!     .with_json_response(serde_json::json!({"result": 42}))
//!     .with_text_response("not json");
//!
//! let echo = FunctionModel::new(|request| {
//!     Ok(Generation::new(
//!         vec![ContentPart::text(request.prompt.clone())],
//!         FinishReason::Stop,
//!     ))
//! });
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use prompt_fn_core::{ContentPart, FinishReason};
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::ModelError;
use crate::model::{Generation, GenerationRequest, Model};

// ============================================================================
// MockModel - Simple pre-configured mock
// ============================================================================

/// A mock model returning queued results in order.
///
/// Every request is recorded. Once the queue is empty the model answers with
/// a plain "Mock response" text generation.
#[derive(Debug, Clone)]
pub struct MockModel {
    name: String,
    responses: Arc<Mutex<VecDeque<Result<Generation, ModelError>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockModel {
    /// Create a new mock model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a generation.
    #[must_use]
    pub fn with_generation(self, generation: Generation) -> Self {
        self.responses.lock().push_back(Ok(generation));
        self
    }

    /// Queue a completed generation whose text is `value` serialized.
    #[must_use]
    pub fn with_json_response(self, value: JsonValue) -> Self {
        let generation = Generation::new(vec![ContentPart::text(value.to_string())], FinishReason::Stop)
            .with_structured_output(value)
            .with_model_name(self.name.clone());
        self.with_generation(generation)
    }

    /// Queue a completed generation holding `text`.
    ///
    /// Structured output is derived the way a real backend would, so free
    /// text yields a generation without it.
    #[must_use]
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        let generation = Generation::from_content(vec![ContentPart::text(text)], FinishReason::Stop)
            .with_model_name(self.name.clone());
        self.with_generation(generation)
    }

    /// Queue a call failure.
    #[must_use]
    pub fn with_error(self, error: ModelError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Number of `generate` calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Get recorded requests.
    #[must_use]
    pub fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }
}

#[async_trait]
impl Model for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ModelError> {
        self.requests.lock().push(request.clone());

        let next = self.responses.lock().pop_front();
        next.unwrap_or_else(|| {
            Ok(
                Generation::new(vec![ContentPart::text("Mock response")], FinishReason::Stop)
                    .with_model_name(self.name.clone()),
            )
        })
    }
}

// ============================================================================
// FunctionModel - Dynamic function-based model
// ============================================================================

/// Type alias for function model callback.
pub type FunctionDef = dyn Fn(&GenerationRequest) -> Result<Generation, ModelError> + Send + Sync;

/// A model controlled by a local function.
///
/// More flexible than [`MockModel`]: the function sees the full request and
/// can answer based on the rendered prompt.
#[derive(Clone)]
pub struct FunctionModel {
    name: String,
    function: Arc<FunctionDef>,
}

impl std::fmt::Debug for FunctionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionModel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl FunctionModel {
    /// Create a new FunctionModel with a response function.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<Generation, ModelError> + Send + Sync + 'static,
    {
        Self {
            name: "function-model".to_string(),
            function: Arc::new(function),
        }
    }

    /// Set a custom model name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl Model for FunctionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "function"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ModelError> {
        (self.function)(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_model_returns_queue_in_order() {
        let model = MockModel::new("test")
            .with_json_response(json!({"result": 42}))
            .with_error(ModelError::http(500, "boom"));

        let first = model.generate(&GenerationRequest::new("a")).await.unwrap();
        assert_eq!(first.output().unwrap(), &json!({"result": 42}));

        let second = model.generate(&GenerationRequest::new("b")).await.unwrap_err();
        assert_eq!(second.response_body(), Some("boom"));

        let fallback = model.generate(&GenerationRequest::new("c")).await.unwrap();
        assert_eq!(fallback.text(), "Mock response");
        assert!(fallback.output().is_err());

        let prompts: Vec<_> = model.recorded_requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(prompts, vec!["a", "b", "c"]);
        assert_eq!(model.call_count(), 3);
    }

    #[test]
    fn test_text_response_derives_output() {
        let model = MockModel::new("test")
            .with_text_response(r#"{"ok": true}"#)
            .with_text_response("plain");

        let first = tokio_test::block_on(model.generate(&GenerationRequest::new("x"))).unwrap();
        assert_eq!(first.structured_output, Some(json!({"ok": true})));

        let second = tokio_test::block_on(model.generate(&GenerationRequest::new("x"))).unwrap();
        assert_eq!(second.structured_output, None);
    }

    #[test]
    fn test_clones_share_state() {
        let model = MockModel::new("test");
        let clone = model.clone();
        tokio_test::block_on(clone.generate(&GenerationRequest::new("x"))).unwrap();
        assert_eq!(model.call_count(), 1);
        model.clear_requests();
        assert_eq!(clone.call_count(), 0);
    }

    #[tokio::test]
    async fn test_function_model_sees_request() {
        let model = FunctionModel::new(|request| {
            Ok(Generation::from_content(
                vec![ContentPart::text(json!({"echo": request.prompt}).to_string())],
                FinishReason::Stop,
            ))
        })
        .with_name("echo");

        let generation = model.generate(&GenerationRequest::new("hi")).await.unwrap();
        assert_eq!(generation.output().unwrap(), &json!({"echo": "hi"}));
        assert_eq!(model.identifier(), "function:echo");
    }
}
