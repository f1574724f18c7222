//! OpenAI-compatible model implementations.
//!
//! [`OpenAIResponsesModel`] talks to the Responses API. The same client serves
//! OpenAI itself and any compatible server (Ollama, gateways) through
//! [`OpenAIResponsesModel::with_base_url`].

pub mod responses;
pub mod types;

pub use responses::{OpenAIResponsesModel, OLLAMA_BASE_URL, OPENAI_BASE_URL};
