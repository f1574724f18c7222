//! # prompt-fn-core
//!
//! Core types, errors, and the logging capability shared by the prompt-fn crates.
//!
//! - **Content**: the parts a generation backend returns ([`ContentPart`]),
//!   why it stopped ([`FinishReason`]) and what it cost ([`Usage`])
//! - **Errors**: [`ValidationError`] for schema failures and
//!   [`ExtractionError`] for unreadable structured output
//! - **Logging**: the [`Logger`] capability, the default [`TracingLogger`]
//!   and an in-memory [`RecordingLogger`] for tests
//!
//! ## Example
//!
//! ```rust
//! use prompt_fn_core::{create_logger, ContentPart, Logger, RecordingLogger, LogLevel};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let recorder = RecordingLogger::new();
//! let logger = create_logger(Some(Arc::new(recorder.clone())), Some("summarize"));
//! logger.warn(json!({"attempt": 1}), "recovered output");
//!
//! let record = &recorder.records()[0];
//! assert_eq!(record.level, LogLevel::Warn);
//! assert_eq!(record.context["module"], "summarize");
//!
//! let part = ContentPart::text(r#"{"ok":true}"#);
//! assert_eq!(part.as_text(), Some(r#"{"ok":true}"#));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod content;
pub mod errors;
pub mod logger;

pub use content::{ContentPart, FinishReason, Usage};
pub use errors::{ExtractionError, ValidationError};
pub use logger::{create_logger, LogLevel, LogRecord, Logger, RecordingLogger, TracingLogger};
