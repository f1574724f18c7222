//! Template forms.
//!
//! A prompt template is either literal text or a function of the input. The
//! function may be synchronous or asynchronous; both are wrapped behind
//! [`TemplateFn`] so the renderer awaits them uniformly.

use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::RenderError;

/// Trait for rendering a prompt from input.
#[async_trait]
pub trait TemplateFn<I>: Send + Sync {
    /// Render the prompt for `input`.
    async fn render(&self, input: &I) -> Result<String, RenderError>;
}

// ============================================================================
// Function Wrappers
// ============================================================================

/// Wrapper for sync template functions.
pub struct SyncTemplateFn<F, I>
where
    F: Fn(&I) -> Result<String, RenderError> + Send + Sync,
{
    func: F,
    _phantom: PhantomData<fn(&I)>,
}

impl<F, I> SyncTemplateFn<F, I>
where
    F: Fn(&I) -> Result<String, RenderError> + Send + Sync,
{
    /// Create a new sync template function.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<F, I> TemplateFn<I> for SyncTemplateFn<F, I>
where
    F: Fn(&I) -> Result<String, RenderError> + Send + Sync,
    I: Send + Sync,
{
    async fn render(&self, input: &I) -> Result<String, RenderError> {
        (self.func)(input)
    }
}

/// Wrapper for async template functions.
pub struct AsyncTemplateFn<F, I, Fut>
where
    F: Fn(&I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, RenderError>> + Send,
{
    func: F,
    _phantom: PhantomData<fn(&I) -> Fut>,
}

impl<F, I, Fut> AsyncTemplateFn<F, I, Fut>
where
    F: Fn(&I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, RenderError>> + Send,
{
    /// Create a new async template function.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<F, I, Fut> TemplateFn<I> for AsyncTemplateFn<F, I, Fut>
where
    F: Fn(&I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, RenderError>> + Send,
    I: Send + Sync,
{
    async fn render(&self, input: &I) -> Result<String, RenderError> {
        (self.func)(input).await
    }
}

// ============================================================================
// Template
// ============================================================================

/// A prompt template.
pub enum Template<I> {
    /// Literal text, or a template reference when an engine is configured.
    Literal(String),
    /// A function computing the prompt from the input.
    Dynamic(Arc<dyn TemplateFn<I>>),
}

impl<I: Send + Sync + 'static> Template<I> {
    /// Literal template text.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Template computed by a sync function.
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&I) -> String + Send + Sync + 'static,
    {
        Self::try_from_fn(move |input: &I| Ok(func(input)))
    }

    /// Template computed by a fallible sync function.
    pub fn try_from_fn<F>(func: F) -> Self
    where
        F: Fn(&I) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(SyncTemplateFn::new(func)))
    }

    /// Template computed by an async function.
    ///
    /// The returned future cannot borrow the input; clone what it needs.
    pub fn from_async_fn<F, Fut>(func: F) -> Self
    where
        F: Fn(&I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, RenderError>> + Send + 'static,
    {
        Self::Dynamic(Arc::new(AsyncTemplateFn::new(func)))
    }
}

impl<I> Template<I> {
    /// `"literal"` or `"function"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Dynamic(_) => "function",
        }
    }

    /// The literal text, if this is a literal template.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(text) => Some(text),
            Self::Dynamic(_) => None,
        }
    }
}

impl<I> Clone for Template<I> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(text) => Self::Literal(text.clone()),
            Self::Dynamic(func) => Self::Dynamic(Arc::clone(func)),
        }
    }
}

impl<I> std::fmt::Debug for Template<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl<I> From<&str> for Template<I> {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl<I> From<String> for Template<I> {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Input {
        name: String,
    }

    #[tokio::test]
    async fn test_sync_function_template() {
        let template = Template::from_fn(|input: &Input| format!("Hello {}", input.name));
        let Template::Dynamic(func) = template else {
            panic!("expected a dynamic template");
        };
        let rendered = func.render(&Input { name: "Ada".into() }).await.unwrap();
        assert_eq!(rendered, "Hello Ada");
    }

    #[tokio::test]
    async fn test_async_function_template() {
        let template = Template::from_async_fn(|input: &Input| {
            let name = input.name.clone();
            async move {
                tokio::task::yield_now().await;
                Ok(format!("Async {name}"))
            }
        });
        assert_eq!(template.kind(), "function");

        let Template::Dynamic(func) = template else {
            panic!("expected a dynamic template");
        };
        let rendered = func.render(&Input { name: "Grace".into() }).await.unwrap();
        assert_eq!(rendered, "Async Grace");
    }

    #[tokio::test]
    async fn test_fallible_function_template() {
        let template: Template<Input> = Template::try_from_fn(|_| Err(RenderError::function("no data")));
        let Template::Dynamic(func) = template else {
            panic!("expected a dynamic template");
        };
        let err = func.render(&Input { name: String::new() }).await.unwrap_err();
        assert_eq!(err.kind(), "template_function");
    }

    #[test]
    fn test_literal_conversions() {
        let template: Template<Input> = "Summarize this".into();
        assert_eq!(template.as_literal(), Some("Summarize this"));
        assert_eq!(template.kind(), "literal");
        assert_eq!(format!("{:?}", template.clone()), "Literal(\"Summarize this\")");
    }
}
