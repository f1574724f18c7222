//! Best-effort recovery of structured output.
//!
//! When the primary structured-output path fails, the raw text the backend
//! produced may still contain a usable JSON document. Recovery gathers the
//! text fragments into a [`RecoveryAttempt`], joins them with `\n`, parses the
//! blob once and validates it against the output schema.
//!
//! Recovery never fails loudly. Every outcome other than "nothing to try" is
//! logged at warning level, and `None` tells the caller to propagate its
//! original error.

use prompt_fn_core::{ContentPart, Logger};
use serde_json::{json, Value as JsonValue};

use crate::schema::Schema;

/// Text fragments collected from a failed generation, in arrival order.
///
/// Fragments are never interpreted individually; only the joined blob is
/// parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryAttempt {
    fragments: Vec<String>,
}

impl RecoveryAttempt {
    /// Collect fragments, skipping missing and empty ones.
    pub fn new<S, F>(fragments: F) -> Self
    where
        S: Into<String>,
        F: IntoIterator<Item = Option<S>>,
    {
        let fragments = fragments
            .into_iter()
            .flatten()
            .map(Into::into)
            .filter(|text: &String| !text.is_empty())
            .collect();
        Self { fragments }
    }

    /// Collect the text of every content part that carries some.
    #[must_use]
    pub fn from_content(content: &[ContentPart]) -> Self {
        Self::new(content.iter().map(ContentPart::as_text))
    }

    /// Collect fragments from a raw response body.
    ///
    /// The body must look like `{"output": [{"content": [{"text": "..."}]}]}`.
    /// Content parts are flattened in document order (message order, then
    /// part order). Parts without text, or with `null` text, are skipped.
    /// Returns `Ok(None)` when that shape is missing, holds no parts, or has a
    /// part whose text is not a string, and `Err` only when the body is not
    /// JSON at all.
    pub fn from_response_body(body: &str) -> Result<Option<Self>, serde_json::Error> {
        let parsed: JsonValue = serde_json::from_str(body)?;

        let Some(messages) = parsed.get("output").and_then(JsonValue::as_array) else {
            return Ok(None);
        };

        let parts: Vec<&JsonValue> = messages
            .iter()
            .filter_map(|message| message.get("content").and_then(JsonValue::as_array))
            .flatten()
            .collect();

        if parts.is_empty() {
            return Ok(None);
        }

        let mut texts = Vec::with_capacity(parts.len());
        for part in parts {
            match part.get("text") {
                None | Some(JsonValue::Null) => texts.push(None),
                Some(JsonValue::String(text)) => texts.push(Some(text.as_str())),
                // A part whose text is not a string breaks the wire shape.
                Some(_) => return Ok(None),
            }
        }

        Ok(Some(Self::new(texts)))
    }

    /// The collected fragments.
    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Fragments joined with a newline and trimmed.
    #[must_use]
    pub fn blob(&self) -> String {
        self.fragments.join("\n").trim().to_string()
    }

    /// Whether there is nothing to parse.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blob().is_empty()
    }

    /// Parse the blob and validate it against `schema`.
    ///
    /// Returns `None` without logging when the blob is empty. Otherwise the
    /// outcome is logged at warning level either way.
    pub fn resolve<T>(&self, schema: &dyn Schema<T>, logger: &dyn Logger, name: &str) -> Option<T> {
        let blob = self.blob();
        if blob.is_empty() {
            return None;
        }

        let recovered = serde_json::from_str::<JsonValue>(&blob)
            .map_err(|e| e.to_string())
            .and_then(|value| schema.parse(value).map_err(|e| e.to_string()));

        match recovered {
            Ok(value) => {
                logger.warn(
                    json!({ "name": name }),
                    "Recovered structured output from raw model content",
                );
                Some(value)
            }
            Err(error) => {
                logger.warn(
                    json!({ "name": name, "error": error }),
                    "Failed to recover structured output from raw model content",
                );
                None
            }
        }
    }
}

/// Collect fragments from a response body, logging a body that is not JSON.
pub fn response_body_attempt(
    body: Option<&str>,
    logger: &dyn Logger,
    name: &str,
) -> Option<RecoveryAttempt> {
    let body = body.filter(|b| !b.is_empty())?;
    match RecoveryAttempt::from_response_body(body) {
        Ok(attempt) => attempt,
        Err(error) => {
            logger.warn(
                json!({ "name": name, "error": error.to_string() }),
                "Failed to parse response body for fallback recovery",
            );
            None
        }
    }
}

/// Recover a typed value from raw content parts.
pub fn recover_from_content<T>(
    content: &[ContentPart],
    schema: &dyn Schema<T>,
    logger: &dyn Logger,
    name: &str,
) -> Option<T> {
    if content.is_empty() {
        return None;
    }
    RecoveryAttempt::from_content(content).resolve(schema, logger, name)
}

/// Recover a typed value from the raw body of a failed backend call.
pub fn recover_from_response_body<T>(
    body: Option<&str>,
    schema: &dyn Schema<T>,
    logger: &dyn Logger,
    name: &str,
) -> Option<T> {
    response_body_attempt(body, logger, name)?.resolve(schema, logger, name)
}
