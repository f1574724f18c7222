//! # prompt-fn-output
//!
//! Output schemas and structured output recovery for prompt-fn.
//!
//! The [`Schema`] trait is the validator capability prompt functions are
//! built on: input values are checked with [`Schema::validate`], raw model
//! output is coerced with [`Schema::parse`]. [`TypedSchema`] implements it on
//! top of serde, and [`SchemaBuilder`] describes the expected JSON shape for
//! the generation backend.
//!
//! When a backend does not return readable structured output, the functions
//! in [`recovery`] try once to rebuild it from the raw text.
//!
//! ## Example
//!
//! ```rust
//! use prompt_fn_core::{ContentPart, RecordingLogger};
//! use prompt_fn_output::{recover_from_content, TypedSchema};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct Sum {
//!     result: f64,
//! }
//!
//! let logger = RecordingLogger::new();
//! let content = [ContentPart::text(r#"{"result": 42}"#)];
//! let sum = recover_from_content(&content, &TypedSchema::<Sum>::new(), &logger, "sum");
//! assert_eq!(sum, Some(Sum { result: 42.0 }));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod json_schema;
pub mod recovery;
pub mod schema;

pub use json_schema::{ObjectJsonSchema, SchemaBuilder};
pub use recovery::{
    recover_from_content, recover_from_response_body, response_body_attempt, RecoveryAttempt,
};
pub use schema::{BoxedSchema, Schema, TypedSchema};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{BoxedSchema, ObjectJsonSchema, Schema, SchemaBuilder, TypedSchema};
}
