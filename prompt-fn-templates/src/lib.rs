//! # prompt-fn-templates
//!
//! Prompt templates for prompt-fn.
//!
//! A prompt function's template is either literal text or a function of the
//! input ([`Template`]). Literal text can also be handed to a
//! [`TemplateEngine`] such as [`MiniJinjaEngine`]. [`PromptRenderer`] settles
//! which of these applies once, at definition time.
//!
//! ## Example
//!
//! ```rust
//! use prompt_fn_templates::{MiniJinjaEngine, PromptRenderer, Template};
//! use serde::Serialize;
//! use std::sync::Arc;
//!
//! #[derive(Serialize)]
//! struct Ticket {
//!     customer: String,
//! }
//!
//! let engine = MiniJinjaEngine::new()
//!     .with_template("triage", "Triage the ticket from {{ customer }}.")
//!     .unwrap();
//! let renderer = PromptRenderer::<Ticket>::build(Template::literal("triage"), Some(Arc::new(engine)))
//!     .unwrap();
//! assert_eq!(renderer.kind(), "engine");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod renderer;
pub mod template;

pub use engine::{MiniJinjaEngine, TemplateEngine};
pub use error::{RenderError, RenderResult};
pub use renderer::PromptRenderer;
pub use template::{AsyncTemplateFn, SyncTemplateFn, Template, TemplateFn};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{MiniJinjaEngine, PromptRenderer, RenderError, Template, TemplateEngine};
}
