//! # prompt-fn - Typed Prompt Functions for Rust
//!
//! prompt-fn turns a prompt into an ordinary async function: input goes in,
//! gets validated against a schema, is rendered into a prompt, is sent to a
//! model, and a value checked against the output schema comes out.
//!
//! ## Quick Start
//!
//! ```ignore
//! use prompt_fn::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Article {
//!     text: String,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Summary {
//!     summary: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summarize = PromptBuilder::<Article, Summary>::new("summarize")
//!         .input_schema(TypedSchema::new())
//!         .output_schema(
//!             TypedSchema::new()
//!                 .with_schema(SchemaBuilder::new().string("summary", "One sentence", true).build()),
//!         )
//!         .template_fn(|a: &Article| format!("Summarize in one sentence:\n{}", a.text))
//!         .model_id("openai:gpt-4o-mini")
//!         .build()?;
//!
//!     let summary = summarize.call(Article { text: "...".into() }).await?;
//!     println!("{}", summary.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Calling a Prompt Function
//!
//! Every call runs the same steps, in order:
//!
//! 1. The input is validated. A rejected input never reaches the model.
//! 2. The prompt is rendered from the template.
//! 3. The model is called once, with its own retries disabled.
//! 4. The structured output is read and checked against the output schema.
//!
//! When step 3 or 4 fails but raw text is available (the model's content, or
//! the body of a failed response), one recovery attempt parses that text as
//! JSON. A recovery is always logged at warning level. If it does not yield a
//! valid value, the original error is returned unchanged.
//!
//! ## Templates
//!
//! - a function of the input ([`PromptBuilder::template_fn`],
//!   [`PromptBuilder::template_async_fn`])
//! - literal text expanded by a [`TemplateEngine`] such as [`MiniJinjaEngine`]
//! - literal text used as is, when no engine is configured
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `openai` | OpenAI Responses API backend | ✅ |
//! | `ollama` | Local Ollama models through the same API | ❌ |
//! | `full` | All features | ❌ |
//!
//! ## Architecture
//!
//! - [`prompt_fn_core`] - Content parts, errors and the logging capability
//! - [`prompt_fn_output`] - Schemas and structured output recovery
//! - [`prompt_fn_models`] - Model trait and implementations
//! - [`prompt_fn_templates`] - Templates, engines and renderer resolution

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod definition;
pub mod errors;
pub mod executor;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Core types, errors and logging.
pub use prompt_fn_core as core;

/// Model trait and implementations.
pub use prompt_fn_models as models;

/// Schemas and output recovery.
pub use prompt_fn_output as output;

/// Templates and engines.
pub use prompt_fn_templates as templates;

// ============================================================================
// Type Re-exports
// ============================================================================

pub use config::{ModelRef, PromptBuilder, PromptConfig};
pub use definition::define_prompt;
pub use errors::{ConfigError, ConfigIssue, PromptError};
pub use executor::PromptFn;

pub use prompt_fn_core::{
    create_logger, ContentPart, ExtractionError, FinishReason, LogLevel, Logger, RecordingLogger,
    TracingLogger, ValidationError,
};
pub use prompt_fn_models::{
    infer_model, BoxedModel, FunctionModel, Generation, GenerationRequest, MockModel, Model,
    ModelError,
};
pub use prompt_fn_output::{BoxedSchema, ObjectJsonSchema, Schema, SchemaBuilder, TypedSchema};
pub use prompt_fn_templates::{MiniJinjaEngine, RenderError, Template, TemplateEngine};

#[cfg(feature = "openai")]
#[cfg_attr(docsrs, doc(cfg(feature = "openai")))]
pub use prompt_fn_models::OpenAIResponsesModel;

/// Start a prompt definition.
///
/// Shorthand for [`PromptBuilder::new`].
pub fn prompt<I, O>(name: impl Into<String>) -> PromptBuilder<I, O>
where
    I: serde::Serialize + Send + Sync + 'static,
    O: Send + 'static,
{
    PromptBuilder::new(name)
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude for common imports.
///
/// ```rust
/// use prompt_fn::prelude::*;
/// ```
pub mod prelude {
    // Definition
    pub use crate::{define_prompt, prompt, ModelRef, PromptBuilder, PromptConfig, PromptFn};

    // Errors
    pub use crate::{
        ConfigError, ExtractionError, ModelError, PromptError, RenderError, ValidationError,
    };

    // Schemas
    pub use crate::{Schema, SchemaBuilder, TypedSchema};

    // Templates
    pub use crate::{MiniJinjaEngine, Template, TemplateEngine};

    // Models
    pub use crate::{infer_model, FunctionModel, Generation, MockModel, Model};

    #[cfg(feature = "openai")]
    pub use crate::OpenAIResponsesModel;

    // Logging
    pub use crate::{Logger, RecordingLogger, TracingLogger};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Question {
        text: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Answer {
        answer: String,
    }

    #[tokio::test]
    async fn test_prompt_shorthand() {
        let ask = prompt::<Question, Answer>("ask")
            .input_schema(TypedSchema::new())
            .output_schema(TypedSchema::new())
            .template("Answer: {{ text }}")
            .engine(MiniJinjaEngine::new())
            .model(MockModel::new("test").with_json_response(serde_json::json!({"answer": "42"})))
            .logger(RecordingLogger::new())
            .build()
            .unwrap();

        let answer = ask
            .call(Question {
                text: "meaning of life".into(),
            })
            .await
            .unwrap();

        assert_eq!(answer, Answer { answer: "42".into() });
        assert_eq!(ask.model_identifier(), "mock:test");
    }
}
