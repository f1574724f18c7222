//! Prompt definition.

use prompt_fn_core::{create_logger, Logger};
use prompt_fn_models::BoxedModel;
use prompt_fn_output::BoxedSchema;
use prompt_fn_templates::PromptRenderer;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::config::PromptConfig;
use crate::errors::ConfigError;
use crate::executor::PromptFn;

/// Everything a prompt function holds after definition.
///
/// Built once and shared read-only by every call.
pub(crate) struct PromptDefinition<I, O> {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: BoxedSchema<I>,
    pub output_schema: BoxedSchema<O>,
    pub renderer: PromptRenderer<I>,
    pub model: BoxedModel,
    pub logger: Arc<dyn Logger>,
}

/// Validate a configuration and produce a prompt function.
///
/// The logger, renderer and model are resolved here, once. Nothing is sent to
/// the model until the function is called.
///
/// # Errors
///
/// Returns [`ConfigError`] listing every problem with the configuration.
pub fn define_prompt<I, O>(config: PromptConfig<I, O>) -> Result<PromptFn<I, O>, ConfigError>
where
    I: Serialize + Send + Sync + 'static,
    O: Send + 'static,
{
    let config = config.validate()?;
    let logger = create_logger(config.logger, Some(&config.name));

    logger.debug(
        json!({
            "name": config.name,
            "description": config.description,
            "model": config.model.identifier(),
            "useEngine": config.engine.is_some(),
            "template": config.template.kind(),
        }),
        "creating a prompt function",
    );

    let renderer = PromptRenderer::build(config.template, config.engine)
        .map_err(|e| ConfigError::single("template", e.to_string()))?;

    logger.debug(
        json!({ "name": config.name, "renderer": renderer.kind() }),
        "prompt function created",
    );

    Ok(PromptFn::new(PromptDefinition {
        name: config.name,
        description: config.description,
        input_schema: config.input_schema,
        output_schema: config.output_schema,
        renderer,
        model: config.model,
        logger,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelRef;
    use prompt_fn_core::{LogLevel, RecordingLogger};
    use prompt_fn_models::MockModel;
    use prompt_fn_output::TypedSchema;
    use prompt_fn_templates::{MiniJinjaEngine, Template};
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Ticket {
        body: String,
    }

    #[derive(Debug, Deserialize)]
    struct Triage {
        priority: String,
    }

    fn config(logger: &RecordingLogger) -> PromptConfig<Ticket, Triage> {
        PromptConfig {
            name: "triage".into(),
            description: None,
            input_schema: Some(Arc::new(TypedSchema::new())),
            output_schema: Some(Arc::new(TypedSchema::new())),
            template: Some(Template::literal("Triage: {{ body }}")),
            engine: Some(Arc::new(MiniJinjaEngine::new())),
            model: Some(ModelRef::Instance(Arc::new(MockModel::new("test")))),
            logger: Some(Arc::new(logger.clone())),
        }
    }

    #[test]
    fn test_definition_logs_creation() {
        let logger = RecordingLogger::new();
        let prompt = define_prompt(config(&logger)).unwrap();

        assert_eq!(prompt.name(), "triage");
        let debug = logger.records_at(LogLevel::Debug);
        assert_eq!(debug.len(), 2);
        assert_eq!(debug[0].message, "creating a prompt function");
        assert_eq!(debug[0].context["module"], "triage");
        assert_eq!(debug[0].context["model"], "mock:test");
        assert_eq!(debug[0].context["useEngine"], true);
        assert_eq!(debug[1].message, "prompt function created");
        assert_eq!(debug[1].context["renderer"], "engine");
    }

    #[test]
    fn test_invalid_config_logs_nothing() {
        let logger = RecordingLogger::new();
        let err = define_prompt(PromptConfig {
            model: None,
            ..config(&logger)
        })
        .err()
        .unwrap();

        assert!(err.has_issue("model"));
        assert!(logger.records().is_empty());
    }

    #[test]
    fn test_definition_makes_no_model_call() {
        let model = Arc::new(MockModel::new("test"));
        let logger = RecordingLogger::new();
        let _prompt = define_prompt(PromptConfig {
            model: Some(ModelRef::Instance(model.clone())),
            ..config(&logger)
        })
        .unwrap();

        assert_eq!(model.call_count(), 0);
    }
}
