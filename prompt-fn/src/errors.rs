//! Prompt function error types.
//!
//! [`ConfigError`] is returned when a definition is rejected. [`PromptError`]
//! is returned by calls; each variant holds the failing stage's own error
//! untouched, and displays exactly like it.

use prompt_fn_core::{ExtractionError, ValidationError};
use prompt_fn_models::ModelError;
use prompt_fn_templates::RenderError;
use std::fmt;
use thiserror::Error;

/// One problem found in a prompt configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Configuration field at fault.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ConfigIssue {
    /// Create a config issue.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A prompt definition was rejected.
///
/// Holds every issue found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ConfigError {
    issues: Vec<ConfigIssue>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid prompt configuration: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl ConfigError {
    /// Create an error from collected issues.
    #[must_use]
    pub fn new(issues: Vec<ConfigIssue>) -> Self {
        Self { issues }
    }

    /// Create an error with a single issue.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![ConfigIssue::new(field, message)])
    }

    /// All issues.
    #[must_use]
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    /// Whether any issue concerns `field`.
    #[must_use]
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

/// A prompt function call failed.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The input did not satisfy the input schema. No model call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The prompt could not be rendered. No model call was made.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The model call failed and its response body held nothing usable.
    #[error(transparent)]
    Call(#[from] ModelError),

    /// The model answered but no valid structured output could be read.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl PromptError {
    /// Stage that failed: `validation`, `render`, `call` or `extraction`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Render(_) => "render",
            Self::Call(_) => "call",
            Self::Extraction(_) => "extraction",
        }
    }

    /// Kind of the wrapped error, used as the logged error name.
    #[must_use]
    pub fn error_name(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Render(e) => e.kind(),
            Self::Call(e) => e.kind(),
            Self::Extraction(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_fn_core::FinishReason;

    #[test]
    fn test_config_error_lists_every_issue() {
        let err = ConfigError::new(vec![
            ConfigIssue::new("name", "must not be empty"),
            ConfigIssue::new("model", "is required"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid prompt configuration: name: must not be empty; model: is required"
        );
        assert!(err.has_issue("model"));
        assert!(!err.has_issue("template"));
        assert_eq!(ConfigError::single("template", "x").issues().len(), 1);
    }

    #[test]
    fn test_prompt_error_is_transparent() {
        let inner = ValidationError::field("text", "must not be empty");
        let expected = inner.to_string();
        let err = PromptError::from(inner);
        assert_eq!(err.to_string(), expected);
        assert_eq!(err.kind(), "validation");

        let err = PromptError::from(ExtractionError::NoOutput {
            finish_reason: FinishReason::Length,
        });
        assert_eq!(err.kind(), "extraction");
        assert_eq!(err.error_name(), "no_output_generated");

        let err = PromptError::from(ModelError::http(503, "unavailable"));
        assert_eq!(err.error_name(), "http_error");
    }
}
