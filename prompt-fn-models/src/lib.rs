//! # prompt-fn-models
//!
//! Generation backends for prompt-fn.
//!
//! This crate provides the [`Model`] trait, the request/response types it
//! exchanges, and these implementations:
//!
//! - **OpenAI**: the Responses API with JSON-schema output (feature: `openai`)
//! - **Ollama**: local models through the same API (feature: `ollama`)
//! - **Testing**: [`MockModel`] and [`FunctionModel`]
//!
//! ## Example
//!
//! ```rust
//! use prompt_fn_models::{GenerationRequest, MockModel, Model};
//!
//! # tokio_test::block_on(async {
//! let model = MockModel::new("test").with_json_response(serde_json::json!({"result": 3}));
//! let generation = model.generate(&GenerationRequest::new("Add 1 and 2")).await.unwrap();
//! assert_eq!(generation.output().unwrap()["result"], 3);
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod mock;
pub mod model;

#[cfg(feature = "openai")]
pub mod openai;

pub use error::{ModelError, ModelResult};
pub use mock::{FunctionModel, MockModel};
pub use model::{BoxedModel, Generation, GenerationRequest, Model};

#[cfg(feature = "openai")]
pub use openai::OpenAIResponsesModel;

/// Infer a model from a string identifier.
///
/// Format: `provider:model_name` or just `model_name` (defaults to OpenAI).
///
/// - `openai:<name>` / `<name>`: needs `OPENAI_API_KEY`, honors `OPENAI_BASE_URL`
/// - `ollama:<name>`: honors `OLLAMA_BASE_URL` (default `http://localhost:11434/v1`)
///
/// # Examples
///
/// ```ignore
/// let model = infer_model("openai:gpt-4o-mini")?;
/// let model = infer_model("ollama:llama3.1")?;
/// ```
pub fn infer_model(identifier: &str) -> ModelResult<BoxedModel> {
    let identifier = identifier.trim();
    let (provider, model_name) = match identifier.split_once(':') {
        Some((provider, name)) => (provider, name),
        None => ("openai", identifier),
    };

    if model_name.trim().is_empty() {
        return Err(ModelError::configuration(format!(
            "Model identifier '{identifier}' has no model name"
        )));
    }

    match provider {
        "openai" | "gpt" => {
            #[cfg(feature = "openai")]
            {
                let model = OpenAIResponsesModel::from_env(model_name)?;
                Ok(std::sync::Arc::new(model))
            }
            #[cfg(not(feature = "openai"))]
            {
                Err(ModelError::configuration(
                    "OpenAI support not enabled. Enable 'openai' feature.",
                ))
            }
        }
        "ollama" => {
            #[cfg(feature = "ollama")]
            {
                Ok(std::sync::Arc::new(OpenAIResponsesModel::ollama(model_name)))
            }
            #[cfg(not(feature = "ollama"))]
            {
                Err(ModelError::configuration(
                    "Ollama support not enabled. Enable 'ollama' feature.",
                ))
            }
        }
        _ => Err(ModelError::configuration(format!(
            "Unknown model provider '{provider}' in '{identifier}'"
        ))),
    }
}

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        infer_model, BoxedModel, FunctionModel, Generation, GenerationRequest, MockModel, Model,
        ModelError, ModelResult,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("anthropic:claude-3-opus")]
    #[case("openai:")]
    #[case("ollama:  ")]
    fn test_infer_model_rejects(#[case] identifier: &str) {
        let err = infer_model(identifier).err().unwrap();
        assert_eq!(err.kind(), "configuration");
    }

    #[cfg(feature = "ollama")]
    #[test]
    fn test_infer_ollama_model() {
        let model = infer_model("ollama:llama3.1").unwrap();
        assert_eq!(model.identifier(), "ollama:llama3.1");
    }
}
