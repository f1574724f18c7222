//! Prompt configuration and its validation.
//!
//! [`PromptConfig`] gathers everything a prompt function needs. Collaborator
//! fields are optional so that a missing piece is reported as a
//! [`ConfigIssue`] instead of being impossible to express. [`PromptBuilder`]
//! fills the config fluently and defines the prompt in one go.

use prompt_fn_core::Logger;
use prompt_fn_models::{infer_model, BoxedModel, Model};
use prompt_fn_output::{BoxedSchema, Schema};
use prompt_fn_templates::{RenderError, Template, TemplateEngine};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::definition::define_prompt;
use crate::errors::{ConfigError, ConfigIssue};
use crate::executor::PromptFn;

/// Reference to a generation backend.
#[derive(Clone)]
pub enum ModelRef {
    /// Identifier resolved through [`infer_model`], e.g. `openai:gpt-4o-mini`.
    Id(String),
    /// A ready backend.
    Instance(BoxedModel),
}

impl ModelRef {
    /// Identifier for logging.
    #[must_use]
    pub fn identifier(&self) -> String {
        match self {
            Self::Id(id) => id.clone(),
            Self::Instance(model) => model.identifier(),
        }
    }
}

impl std::fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => f.debug_tuple("Id").field(id).finish(),
            Self::Instance(model) => f.debug_tuple("Instance").field(&model.identifier()).finish(),
        }
    }
}

impl From<&str> for ModelRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for ModelRef {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<BoxedModel> for ModelRef {
    fn from(model: BoxedModel) -> Self {
        Self::Instance(model)
    }
}

/// Configuration of a prompt function.
pub struct PromptConfig<I, O> {
    /// Prompt name, used in logs.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Schema the input must satisfy.
    pub input_schema: Option<BoxedSchema<I>>,
    /// Schema the output must satisfy.
    pub output_schema: Option<BoxedSchema<O>>,
    /// Prompt template.
    pub template: Option<Template<I>>,
    /// Engine expanding literal templates.
    pub engine: Option<Arc<dyn TemplateEngine>>,
    /// Generation backend.
    pub model: Option<ModelRef>,
    /// Logger; a tracing logger is created when absent.
    pub logger: Option<Arc<dyn Logger>>,
}

impl<I, O> Default for PromptConfig<I, O> {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            input_schema: None,
            output_schema: None,
            template: None,
            engine: None,
            model: None,
            logger: None,
        }
    }
}

impl<I, O> std::fmt::Debug for PromptConfig<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptConfig")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("has_input_schema", &self.input_schema.is_some())
            .field("has_output_schema", &self.output_schema.is_some())
            .field("template", &self.template)
            .field("has_engine", &self.engine.is_some())
            .field("model", &self.model)
            .field("has_logger", &self.logger.is_some())
            .finish()
    }
}

/// A configuration that passed validation.
pub(crate) struct ValidatedConfig<I, O> {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: BoxedSchema<I>,
    pub output_schema: BoxedSchema<O>,
    pub template: Template<I>,
    pub engine: Option<Arc<dyn TemplateEngine>>,
    pub model: BoxedModel,
    pub logger: Option<Arc<dyn Logger>>,
}

impl<I, O> PromptConfig<I, O> {
    /// Check the configuration, reporting every issue found.
    ///
    /// Model identifiers are resolved here, so an unknown provider or a
    /// missing API key fails the definition rather than the first call.
    pub(crate) fn validate(self) -> Result<ValidatedConfig<I, O>, ConfigError> {
        let mut issues = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            issues.push(ConfigIssue::new("name", "must not be empty"));
        }

        let description = match self.description.as_deref().map(str::trim) {
            Some("") => {
                issues.push(ConfigIssue::new("description", "must not be empty when provided"));
                None
            }
            other => other.map(str::to_string),
        };

        if self.input_schema.is_none() {
            issues.push(ConfigIssue::new("input_schema", "is required"));
        }
        if self.output_schema.is_none() {
            issues.push(ConfigIssue::new("output_schema", "is required"));
        }

        // Literal text doubles as an engine reference, so it is trimmed too.
        let template = match self.template {
            None => {
                issues.push(ConfigIssue::new("template", "is required"));
                None
            }
            Some(Template::Literal(text)) if text.trim().is_empty() => {
                issues.push(ConfigIssue::new("template", "must not be empty"));
                None
            }
            Some(Template::Literal(text)) => Some(Template::Literal(text.trim().to_string())),
            Some(dynamic) => Some(dynamic),
        };

        let model = match self.model {
            None => {
                issues.push(ConfigIssue::new("model", "is required"));
                None
            }
            Some(ModelRef::Id(id)) if id.trim().is_empty() => {
                issues.push(ConfigIssue::new("model", "must not be empty"));
                None
            }
            Some(ModelRef::Id(id)) => match infer_model(id.trim()) {
                Ok(model) => Some(model),
                Err(e) => {
                    issues.push(ConfigIssue::new("model", e.to_string()));
                    None
                }
            },
            Some(ModelRef::Instance(model)) => Some(model),
        };

        match (self.input_schema, self.output_schema, template, model) {
            (Some(input_schema), Some(output_schema), Some(template), Some(model))
                if issues.is_empty() =>
            {
                Ok(ValidatedConfig {
                    name,
                    description,
                    input_schema,
                    output_schema,
                    template,
                    engine: self.engine,
                    model,
                    logger: self.logger,
                })
            }
            _ => Err(ConfigError::new(issues)),
        }
    }
}

/// Fluent builder for prompt functions.
///
/// ```rust
/// use prompt_fn::prelude::*;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Numbers {
///     a: f64,
///     b: f64,
/// }
///
/// #[derive(Debug, Deserialize)]
/// struct Sum {
///     result: f64,
/// }
///
/// let add = PromptBuilder::<Numbers, Sum>::new("add")
///     .description("Adds two numbers")
///     .input_schema(TypedSchema::new())
///     .output_schema(TypedSchema::new())
///     .template_fn(|n: &Numbers| format!("Add {} and {}", n.a, n.b))
///     .model(MockModel::new("test").with_json_response(serde_json::json!({"result": 3.0})))
///     .build()
///     .unwrap();
///
/// assert_eq!(add.name(), "add");
/// ```
pub struct PromptBuilder<I, O> {
    config: PromptConfig<I, O>,
}

impl<I, O> PromptBuilder<I, O>
where
    I: Serialize + Send + Sync + 'static,
    O: Send + 'static,
{
    /// Start a prompt definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: PromptConfig {
                name: name.into(),
                ..PromptConfig::default()
            },
        }
    }

    /// Rename the prompt.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    /// Set the input schema.
    #[must_use]
    pub fn input_schema<S: Schema<I> + 'static>(self, schema: S) -> Self {
        self.input_schema_arc(Arc::new(schema))
    }

    /// Set a shared input schema.
    #[must_use]
    pub fn input_schema_arc(mut self, schema: BoxedSchema<I>) -> Self {
        self.config.input_schema = Some(schema);
        self
    }

    /// Set the output schema.
    #[must_use]
    pub fn output_schema<S: Schema<O> + 'static>(self, schema: S) -> Self {
        self.output_schema_arc(Arc::new(schema))
    }

    /// Set a shared output schema.
    #[must_use]
    pub fn output_schema_arc(mut self, schema: BoxedSchema<O>) -> Self {
        self.config.output_schema = Some(schema);
        self
    }

    /// Set the template: literal text, or a [`Template`].
    #[must_use]
    pub fn template(mut self, template: impl Into<Template<I>>) -> Self {
        self.config.template = Some(template.into());
        self
    }

    /// Render the prompt with a sync function.
    #[must_use]
    pub fn template_fn<F>(self, func: F) -> Self
    where
        F: Fn(&I) -> String + Send + Sync + 'static,
    {
        self.template(Template::from_fn(func))
    }

    /// Render the prompt with an async function.
    #[must_use]
    pub fn template_async_fn<F, Fut>(self, func: F) -> Self
    where
        F: Fn(&I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, RenderError>> + Send + 'static,
    {
        self.template(Template::from_async_fn(func))
    }

    /// Expand literal templates with an engine.
    #[must_use]
    pub fn engine<E: TemplateEngine + 'static>(self, engine: E) -> Self {
        self.engine_arc(Arc::new(engine))
    }

    /// Expand literal templates with a shared engine.
    #[must_use]
    pub fn engine_arc(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    /// Use a model.
    #[must_use]
    pub fn model<M: Model + 'static>(self, model: M) -> Self {
        self.model_arc(Arc::new(model))
    }

    /// Use a shared model.
    #[must_use]
    pub fn model_arc(mut self, model: BoxedModel) -> Self {
        self.config.model = Some(ModelRef::Instance(model));
        self
    }

    /// Use a model identifier such as `openai:gpt-4o-mini`.
    #[must_use]
    pub fn model_id(mut self, id: impl Into<String>) -> Self {
        self.config.model = Some(ModelRef::Id(id.into()));
        self
    }

    /// Use a logger.
    #[must_use]
    pub fn logger<L: Logger + 'static>(self, logger: L) -> Self {
        self.logger_arc(Arc::new(logger))
    }

    /// Use a shared logger.
    #[must_use]
    pub fn logger_arc(mut self, logger: Arc<dyn Logger>) -> Self {
        self.config.logger = Some(logger);
        self
    }

    /// The configuration built so far.
    #[must_use]
    pub fn into_config(self) -> PromptConfig<I, O> {
        self.config
    }

    /// Validate the configuration and define the prompt function.
    pub fn build(self) -> Result<PromptFn<I, O>, ConfigError> {
        define_prompt(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_fn_models::MockModel;
    use prompt_fn_output::TypedSchema;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Input {
        text: String,
    }

    #[derive(Debug, Deserialize)]
    struct Output {
        summary: String,
    }

    fn complete() -> PromptConfig<Input, Output> {
        PromptConfig {
            name: "summarize".into(),
            description: Some("Summarizes text".into()),
            input_schema: Some(Arc::new(TypedSchema::new())),
            output_schema: Some(Arc::new(TypedSchema::new())),
            template: Some(Template::literal("Summarize")),
            engine: None,
            model: Some(ModelRef::Instance(Arc::new(MockModel::new("test")))),
            logger: None,
        }
    }

    #[test]
    fn test_complete_config_is_valid() {
        let validated = complete().validate().ok().unwrap();
        assert_eq!(validated.name, "summarize");
        assert_eq!(validated.model.identifier(), "mock:test");
    }

    #[test]
    fn test_name_is_trimmed() {
        let config = PromptConfig {
            name: "  summarize \n".into(),
            ..complete()
        };
        assert_eq!(config.validate().ok().unwrap().name, "summarize");
    }

    #[rstest]
    #[case::blank_name(PromptConfig { name: "   ".into(), ..complete() }, "name")]
    #[case::blank_description(PromptConfig { description: Some(" ".into()), ..complete() }, "description")]
    #[case::missing_input_schema(PromptConfig { input_schema: None, ..complete() }, "input_schema")]
    #[case::missing_output_schema(PromptConfig { output_schema: None, ..complete() }, "output_schema")]
    #[case::missing_template(PromptConfig { template: None, ..complete() }, "template")]
    #[case::blank_template(PromptConfig { template: Some(Template::literal("\t")), ..complete() }, "template")]
    #[case::missing_model(PromptConfig { model: None, ..complete() }, "model")]
    #[case::blank_model_id(PromptConfig { model: Some(ModelRef::from("  ")), ..complete() }, "model")]
    #[case::unknown_provider(PromptConfig { model: Some(ModelRef::from("acme:large")), ..complete() }, "model")]
    fn test_invalid_config(#[case] config: PromptConfig<Input, Output>, #[case] field: &str) {
        let err = config.validate().err().unwrap();
        assert_eq!(err.issues().len(), 1, "{err}");
        assert!(err.has_issue(field), "{err}");
    }

    #[test]
    fn test_every_issue_is_reported() {
        let config: PromptConfig<Input, Output> = PromptConfig {
            name: String::new(),
            ..PromptConfig::default()
        };
        let err = config.validate().err().unwrap();
        let fields: Vec<_> = err.issues().iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["name", "input_schema", "output_schema", "template", "model"]
        );
    }

    #[test]
    fn test_text_fields_are_trimmed() {
        let config = PromptConfig {
            description: Some("  Summarizes text\n".into()),
            template: Some(Template::literal("  Fixed prompt  ")),
            ..complete()
        };
        let validated = config.validate().ok().unwrap();

        assert_eq!(validated.description.as_deref(), Some("Summarizes text"));
        assert_eq!(validated.template.as_literal(), Some("Fixed prompt"));
    }

    #[test]
    fn test_builder_fills_config() {
        let config = PromptBuilder::<Input, Output>::new("draft")
            .name("summarize")
            .description("Summarizes text")
            .template("Summarize {{ text }}")
            .model_id("ollama:llama3.1")
            .into_config();

        assert_eq!(config.name, "summarize");
        assert_eq!(config.template.as_ref().and_then(Template::as_literal), Some("Summarize {{ text }}"));
        assert_eq!(config.model.as_ref().map(ModelRef::identifier).as_deref(), Some("ollama:llama3.1"));
        assert!(config.input_schema.is_none());
    }
}
