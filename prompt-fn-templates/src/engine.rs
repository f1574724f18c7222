//! Templating engines.
//!
//! A [`TemplateEngine`] expands a template reference with JSON data. The
//! bundled [`MiniJinjaEngine`] uses Jinja2 syntax through `minijinja`.

use async_trait::async_trait;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde_json::Value as JsonValue;
use std::path::Path;

use crate::error::RenderError;

/// Capability for rendering named templates.
///
/// Engines are shared by every call of a prompt function and may be used
/// concurrently; implementations own their own synchronization.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateEngine: Send + Sync {
    /// Render `template_ref` with `data` as the context.
    async fn render_async(&self, template_ref: &str, data: &JsonValue) -> Result<String, RenderError>;
}

/// `minijinja`-backed engine.
///
/// A reference names a registered template (or a file under the loader
/// directory). A reference that names no template is rendered as inline
/// template source, so `"Hello {{ name }}"` works without registration.
///
/// ```rust
/// use prompt_fn_templates::{MiniJinjaEngine, TemplateEngine};
///
/// # tokio_test::block_on(async {
/// let engine = MiniJinjaEngine::new()
///     .with_template("greeting", "Hello {{ name }}!")
///     .unwrap();
/// let data = serde_json::json!({"name": "Ada"});
/// assert_eq!(engine.render_async("greeting", &data).await.unwrap(), "Hello Ada!");
/// assert_eq!(engine.render_async("Bye {{ name }}", &data).await.unwrap(), "Bye Ada");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Create an engine with no registered templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Create an engine that loads templates from a directory.
    pub fn from_directory(dir: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir.as_ref()));
        Self { env }
    }

    /// Register a named template.
    pub fn with_template(
        mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, RenderError> {
        let name = name.into();
        self.env
            .add_template_owned(name.clone(), source.into())
            .map_err(|e| RenderError::engine(name, e))?;
        Ok(self)
    }

    /// Fail on undefined variables instead of rendering them empty.
    #[must_use]
    pub fn with_strict_undefined(mut self) -> Self {
        self.env.set_undefined_behavior(UndefinedBehavior::Strict);
        self
    }

    /// Access the underlying environment, e.g. to add filters.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Render synchronously.
    pub fn render(&self, template_ref: &str, data: &JsonValue) -> Result<String, RenderError> {
        let ctx = minijinja::Value::from_serialize(data);
        match self.env.get_template(template_ref) {
            Ok(template) => template
                .render(ctx)
                .map_err(|e| RenderError::engine(template_ref, e)),
            // A loader reports names it cannot read as invalid operations.
            Err(e) if matches!(e.kind(), ErrorKind::TemplateNotFound | ErrorKind::InvalidOperation) => {
                tracing::debug!(template = template_ref, "rendering reference as inline source");
                self.env
                    .render_str(template_ref, ctx)
                    .map_err(|e| RenderError::engine(template_ref, e))
            }
            Err(e) => Err(RenderError::engine(template_ref, e)),
        }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateEngine for MiniJinjaEngine {
    async fn render_async(&self, template_ref: &str, data: &JsonValue) -> Result<String, RenderError> {
        self.render(template_ref, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_named_template() {
        let engine = MiniJinjaEngine::new()
            .with_template("ticket", "Ticket from {{ customer }}: {{ body | upper }}")
            .unwrap();
        let rendered = engine
            .render("ticket", &json!({"customer": "Ada", "body": "help"}))
            .unwrap();
        assert_eq!(rendered, "Ticket from Ada: HELP");
    }

    #[test]
    fn test_inline_source_fallback() {
        let engine = MiniJinjaEngine::new();
        let rendered = engine
            .render("{% for t in tags %}#{{ t }} {% endfor %}", &json!({"tags": ["a", "b"]}))
            .unwrap();
        assert_eq!(rendered, "#a #b ");
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_inline_fallback_is_logged_at_debug() {
        let engine = MiniJinjaEngine::new().with_template("ticket", "T{{ x }}").unwrap();
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(engine.render("ticket", &json!({"x": 7})).unwrap(), "T7");
            assert_eq!(engine.render(" ticket ", &json!({"x": 7})).unwrap(), " ticket ");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 1, "{output}");
        assert!(lines[0].contains("DEBUG"));
        assert!(lines[0].contains("rendering reference as inline source"));
    }

    #[test]
    fn test_syntax_error_is_engine_error() {
        let err = MiniJinjaEngine::new().with_template("broken", "{% if %}").unwrap_err();
        assert_eq!(err.kind(), "template_engine");

        let err = MiniJinjaEngine::new().render("{{ unclosed", &json!({})).unwrap_err();
        assert_eq!(err.kind(), "template_engine");
    }

    #[test]
    fn test_strict_undefined() {
        let lenient = MiniJinjaEngine::new();
        assert_eq!(lenient.render("[{{ missing }}]", &json!({})).unwrap(), "[]");

        let strict = MiniJinjaEngine::new().with_strict_undefined();
        assert!(strict.render("[{{ missing }}]", &json!({})).is_err());
    }

    #[tokio::test]
    async fn test_directory_loader() {
        let dir = std::env::temp_dir().join(format!("prompt-fn-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("brief.txt"), "Brief for {{ product }}").unwrap();

        let engine = MiniJinjaEngine::from_directory(&dir);
        let rendered = engine
            .render_async("brief.txt", &json!({"product": "Widget"}))
            .await
            .unwrap();
        assert_eq!(rendered, "Brief for Widget");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
