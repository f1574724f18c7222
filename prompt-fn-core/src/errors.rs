//! Error types shared across prompt-fn crates.
//!
//! Backend failures live in `prompt-fn-models` and rendering failures in
//! `prompt-fn-templates`; this module only holds the errors every stage of the
//! pipeline can produce or inspect.

use std::fmt;
use thiserror::Error;

use crate::content::FinishReason;

/// A value did not satisfy a schema.
///
/// The `path` points at the offending location using `$`-rooted notation
/// (`$` for the whole value, `$.name`, `$.items[0]`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Location of the violation inside the validated value.
    pub path: String,
    /// Human readable description of the violation.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed at {}: {}", self.path, self.message)
    }
}

impl ValidationError {
    /// Create a validation error at a given path.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a validation error for the whole value.
    pub fn root(message: impl Into<String>) -> Self {
        Self::new("$", message)
    }

    /// Create a validation error for a top-level field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::new(format!("$.{field}"), message)
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::root(err.to_string())
    }
}

/// Structured output could not be read from an otherwise successful generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The backend did not produce a structured output field.
    #[error("No structured output generated (finish reason: {finish_reason})")]
    NoOutput {
        /// Why the backend stopped generating.
        finish_reason: FinishReason,
    },

    /// The structured output does not satisfy the output schema.
    #[error("Structured output does not match the output schema: {0}")]
    Schema(#[from] ValidationError),
}

impl ExtractionError {
    /// Stable name of the error kind, used for log correlation.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoOutput { .. } => "no_output_generated",
            Self::Schema(_) => "output_schema_mismatch",
        }
    }
}
