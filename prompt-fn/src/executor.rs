//! Prompt function execution.
//!
//! A call walks one sequential pipeline:
//!
//! ```text
//! validate -> render -> generate -> extract -> done
//!                           |          |
//!                           +----+-----+
//!                                v
//!                             recover -> done | fail
//! ```
//!
//! Each failing stage either ends the call or hands a [`RecoveryAttempt`] to
//! the single recovery step. The model is called exactly once per call.

use prompt_fn_core::{ExtractionError, Logger};
use prompt_fn_models::{Generation, GenerationRequest, ModelError};
use prompt_fn_output::{response_body_attempt, RecoveryAttempt};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::definition::PromptDefinition;
use crate::errors::PromptError;

/// Where a stage left the call.
enum Outcome<O> {
    /// A value was produced.
    Success(O),
    /// The stage failed but left raw text worth one recovery try.
    Recoverable {
        attempt: RecoveryAttempt,
        error: PromptError,
    },
    /// Nothing left to try.
    Fatal(PromptError),
}

/// A typed prompt function.
///
/// Cheap to clone; clones share the same definition. Calls are independent
/// and may run concurrently.
pub struct PromptFn<I, O> {
    definition: Arc<PromptDefinition<I, O>>,
}

impl<I, O> Clone for PromptFn<I, O> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
        }
    }
}

impl<I, O> std::fmt::Debug for PromptFn<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptFn")
            .field("name", &self.definition.name)
            .field("model", &self.definition.model.identifier())
            .field("renderer", &self.definition.renderer.kind())
            .finish_non_exhaustive()
    }
}

impl<I, O> PromptFn<I, O> {
    pub(crate) fn new(definition: PromptDefinition<I, O>) -> Self {
        Self {
            definition: Arc::new(definition),
        }
    }

    /// Prompt name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Prompt description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    /// Identifier of the model the prompt calls.
    #[must_use]
    pub fn model_identifier(&self) -> String {
        self.definition.model.identifier()
    }
}

impl<I, O> PromptFn<I, O>
where
    I: Serialize + Send + Sync + 'static,
    O: Send + 'static,
{
    /// Run the prompt for `input`.
    ///
    /// # Errors
    ///
    /// - [`PromptError::Validation`]: the input was rejected, the model was not called
    /// - [`PromptError::Render`]: the prompt could not be rendered, the model was not called
    /// - [`PromptError::Call`]: the model call failed and its body held no usable output
    /// - [`PromptError::Extraction`]: no valid output could be read from the generation
    pub async fn call(&self, input: I) -> Result<O, PromptError> {
        let call_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "prompt_call",
            prompt = %self.definition.name,
            call_id = %call_id
        );
        self.run(input, call_id).instrument(span).await
    }

    async fn run(&self, input: I, call_id: Uuid) -> Result<O, PromptError> {
        let def = &*self.definition;
        let logger = def.logger.child(json!({ "call_id": call_id.to_string() }));
        let name = def.name.as_str();

        logger.debug(
            json!({ "name": name, "data": serde_json::to_value(&input).unwrap_or_default() }),
            "validating prompt input",
        );
        let input = def.input_schema.validate(input).map_err(|e| {
            logger.error(
                json!({ "errorName": "validation_error", "path": e.path }),
                "Invalid prompt input",
            );
            PromptError::from(e)
        })?;
        logger.debug(
            json!({ "name": name, "parsed": serde_json::to_value(&input).unwrap_or_default() }),
            "input validated",
        );

        let prompt = def.renderer.render(&input).await.map_err(|e| {
            logger.error(json!({ "errorName": e.kind() }), "Unable to render prompt");
            PromptError::from(e)
        })?;
        logger.debug(json!({ "name": name, "prompt": prompt }), "prompt rendered");

        let request = GenerationRequest::new(prompt)
            .with_output_schema(def.output_schema.json_schema())
            .with_max_retries(0);

        match def.model.generate(&request).await {
            Ok(generation) => {
                logger.debug(
                    json!({
                        "name": name,
                        "finishReason": generation.finish_reason.to_string(),
                        "modelName": generation.model_name,
                    }),
                    "model call succeeded",
                );
                let outcome = self.extract(&generation);
                self.settle(outcome, &*logger, |error| {
                    logger.error(
                        json!({ "errorName": error.error_name(), "content": generation.content }),
                        "Unable to read structured output",
                    );
                })
            }
            Err(error) => {
                let outcome = Self::call_failed(error, &*logger, name);
                self.settle(outcome, &*logger, |error| {
                    if let PromptError::Call(e) = error {
                        if let Some(body) = e.response_body() {
                            logger.info(json!({ "responseBody": body }), "Response body of failed model call");
                        }
                    }
                    logger.error(
                        json!({ "errorName": error.error_name() }),
                        "Unable to generate response",
                    );
                })
            }
        }
    }

    /// Read the structured output of a generation.
    fn extract(&self, generation: &Generation) -> Outcome<O> {
        let parsed = generation
            .output()
            .map_err(PromptError::from)
            .and_then(|value| {
                self.definition
                    .output_schema
                    .parse(value.clone())
                    .map_err(|e| PromptError::from(ExtractionError::Schema(e)))
            });

        match parsed {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Recoverable {
                attempt: RecoveryAttempt::from_content(&generation.content),
                error,
            },
        }
    }

    fn call_failed(error: ModelError, logger: &dyn Logger, name: &str) -> Outcome<O> {
        let attempt = response_body_attempt(error.response_body(), logger, name);
        match attempt {
            Some(attempt) => Outcome::Recoverable {
                attempt,
                error: error.into(),
            },
            None => Outcome::Fatal(error.into()),
        }
    }

    /// Turn an outcome into the call result, running recovery once.
    ///
    /// `on_fatal` runs right before the original error is returned.
    fn settle(
        &self,
        outcome: Outcome<O>,
        logger: &dyn Logger,
        on_fatal: impl FnOnce(&PromptError),
    ) -> Result<O, PromptError> {
        let def = &*self.definition;
        let error = match outcome {
            Outcome::Success(value) => return Ok(value),
            Outcome::Recoverable { attempt, error } => {
                match attempt.resolve(def.output_schema.as_ref(), logger, &def.name) {
                    Some(value) => return Ok(value),
                    None => error,
                }
            }
            Outcome::Fatal(error) => error,
        };
        on_fatal(&error);
        Err(error)
    }
}
