//! Rendering error types.

use thiserror::Error;

/// A prompt could not be rendered.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The templating engine failed.
    #[error("Template '{template}' failed to render: {message}")]
    Engine {
        /// Template reference passed to the engine.
        template: String,
        /// Engine error message.
        message: String,
    },

    /// The input could not be turned into template data.
    #[error("Failed to serialize template data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The template cannot be resolved into a renderer.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// A template function failed.
    #[error("Template function failed: {0}")]
    Function(String),
}

impl RenderError {
    /// Create an engine error.
    pub fn engine(template: impl Into<String>, message: impl ToString) -> Self {
        Self::Engine {
            template: template.into(),
            message: message.to_string(),
        }
    }

    /// Create a template function error.
    pub fn function(message: impl Into<String>) -> Self {
        Self::Function(message.into())
    }

    /// Stable name of the error kind, used for log correlation.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Engine { .. } => "template_engine",
            Self::Serialization(_) => "template_data",
            Self::InvalidTemplate(_) => "invalid_template",
            Self::Function(_) => "template_function",
        }
    }
}

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;
