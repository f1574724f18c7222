//! Renderer resolution.
//!
//! [`PromptRenderer::build`] turns a template and an optional engine into one
//! renderer, once, when a prompt function is defined. Resolution order:
//!
//! 1. literal text with an engine: the text is a template reference for the engine
//! 2. a template function: called with the input
//! 3. literal text without an engine: returned as is, the input is ignored
//!
//! Blank literal text resolves to nothing and is rejected.

use serde::Serialize;
use std::sync::Arc;

use crate::engine::TemplateEngine;
use crate::error::RenderError;
use crate::template::{Template, TemplateFn};

/// A resolved prompt renderer.
pub enum PromptRenderer<I> {
    /// Expand a template reference with the input as data.
    Engine {
        /// The engine.
        engine: Arc<dyn TemplateEngine>,
        /// Reference handed to the engine.
        template_ref: String,
    },
    /// Call a template function.
    Dynamic(Arc<dyn TemplateFn<I>>),
    /// Return fixed text.
    Literal(String),
}

impl<I> PromptRenderer<I> {
    /// Resolve `template` against an optional engine.
    pub fn build(
        template: Template<I>,
        engine: Option<Arc<dyn TemplateEngine>>,
    ) -> Result<Self, RenderError> {
        match (template, engine) {
            (Template::Literal(text), _) if text.trim().is_empty() => Err(
                RenderError::InvalidTemplate("template text must not be blank".to_string()),
            ),
            (Template::Literal(template_ref), Some(engine)) => Ok(Self::Engine {
                engine,
                template_ref,
            }),
            (Template::Dynamic(func), _) => Ok(Self::Dynamic(func)),
            (Template::Literal(text), None) => Ok(Self::Literal(text)),
        }
    }

    /// `"engine"`, `"function"` or `"literal"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Engine { .. } => "engine",
            Self::Dynamic(_) => "function",
            Self::Literal(_) => "literal",
        }
    }
}

impl<I: Serialize + Sync> PromptRenderer<I> {
    /// Render the prompt for `input`.
    pub async fn render(&self, input: &I) -> Result<String, RenderError> {
        match self {
            Self::Engine {
                engine,
                template_ref,
            } => {
                let data = serde_json::to_value(input)?;
                engine.render_async(template_ref, &data).await
            }
            Self::Dynamic(func) => func.render(input).await,
            Self::Literal(text) => Ok(text.clone()),
        }
    }
}

impl<I> Clone for PromptRenderer<I> {
    fn clone(&self) -> Self {
        match self {
            Self::Engine {
                engine,
                template_ref,
            } => Self::Engine {
                engine: Arc::clone(engine),
                template_ref: template_ref.clone(),
            },
            Self::Dynamic(func) => Self::Dynamic(Arc::clone(func)),
            Self::Literal(text) => Self::Literal(text.clone()),
        }
    }
}

impl<I> std::fmt::Debug for PromptRenderer<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine { template_ref, .. } => f
                .debug_struct("Engine")
                .field("template_ref", template_ref)
                .finish_non_exhaustive(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MiniJinjaEngine, MockTemplateEngine};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Serialize)]
    struct Input {
        text: String,
    }

    fn input(text: &str) -> Input {
        Input { text: text.into() }
    }

    #[tokio::test]
    async fn test_literal_with_engine_uses_engine() {
        let mut engine = MockTemplateEngine::new();
        engine
            .expect_render_async()
            .withf(|template_ref, data| {
                template_ref.to_string() == "summary" && *data == json!({"text": "hi"})
            })
            .times(1)
            .returning(|_, _| Ok("rendered by engine".to_string()));

        let renderer = PromptRenderer::build(Template::literal("summary"), Some(Arc::new(engine))).unwrap();

        assert_eq!(renderer.kind(), "engine");
        assert_eq!(renderer.render(&input("hi")).await.unwrap(), "rendered by engine");
    }

    #[tokio::test]
    async fn test_engine_errors_propagate() {
        let mut engine = MockTemplateEngine::new();
        engine
            .expect_render_async()
            .returning(|template_ref, _| Err(RenderError::engine(template_ref, "boom")));

        let renderer = PromptRenderer::build(Template::literal("summary"), Some(Arc::new(engine))).unwrap();
        let err = renderer.render(&input("hi")).await.unwrap_err();

        assert_eq!(err.to_string(), "Template 'summary' failed to render: boom");
    }

    #[tokio::test]
    async fn test_function_wins_over_engine() {
        let engine = MockTemplateEngine::new();
        let template = Template::from_fn(|i: &Input| format!("fn: {}", i.text));

        let renderer = PromptRenderer::build(template, Some(Arc::new(engine))).unwrap();

        assert_eq!(renderer.kind(), "function");
        assert_eq!(renderer.render(&input("x")).await.unwrap(), "fn: x");
    }

    #[rstest]
    #[case("one")]
    #[case("two")]
    #[tokio::test]
    async fn test_literal_ignores_input(#[case] text: &str) {
        let renderer = PromptRenderer::build(Template::literal("Fixed prompt"), None).unwrap();
        assert_eq!(renderer.render(&input(text)).await.unwrap(), "Fixed prompt");
    }

    #[rstest]
    #[case("")]
    #[case("   \n")]
    fn test_blank_literal_is_rejected(#[case] text: &str) {
        let err = PromptRenderer::<Input>::build(Template::literal(text), None).unwrap_err();
        assert_eq!(err.kind(), "invalid_template");
    }

    #[tokio::test]
    async fn test_minijinja_engine_renders_input() {
        let engine = MiniJinjaEngine::new()
            .with_template("echo", "Echo: {{ text }}")
            .unwrap();
        let renderer: PromptRenderer<Input> =
            PromptRenderer::build(Template::literal("echo"), Some(Arc::new(engine))).unwrap();

        assert_eq!(renderer.render(&input("hello")).await.unwrap(), "Echo: hello");
        assert_eq!(format!("{:?}", renderer.clone()), "Engine { template_ref: \"echo\", .. }");
    }
}
