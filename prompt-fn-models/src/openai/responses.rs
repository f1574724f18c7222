//! OpenAI Responses API implementation.
//!
//! Structured output is requested through `text.format` with a JSON schema.
//! Any server that speaks the Responses API (OpenAI, Ollama, proxies) can be
//! targeted by changing the base URL.

use async_trait::async_trait;
use prompt_fn_core::{ContentPart, FinishReason, Usage};
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

use super::types::{
    MessageContentItem, OpenAIError, ReasoningSummaryItem, ResponseOutputItem, ResponseStatus,
    ResponsesApiRequest, ResponsesApiResponse, TextConfig, TextFormat,
};
use crate::error::ModelError;
use crate::model::{Generation, GenerationRequest, Model};

/// Default OpenAI endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default local Ollama endpoint.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// OpenAI Responses API model.
///
/// # Example
///
/// ```rust,ignore
/// use prompt_fn_models::openai::OpenAIResponsesModel;
/// use prompt_fn_models::{GenerationRequest, Model};
///
/// let model = OpenAIResponsesModel::from_env("gpt-4o-mini")?;
/// let generation = model.generate(&GenerationRequest::new("Say hi as JSON")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenAIResponsesModel {
    model_name: String,
    system: &'static str,
    client: Client,
    api_key: String,
    base_url: String,
    organization: Option<String>,
    default_timeout: Duration,
    max_output_tokens: Option<u64>,
}

impl OpenAIResponsesModel {
    /// Create a new OpenAI Responses model.
    pub fn new(model_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            system: "openai",
            client: Client::new(),
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            organization: None,
            default_timeout: Duration::from_secs(120),
            max_output_tokens: None,
        }
    }

    /// Create from `OPENAI_API_KEY`, honoring `OPENAI_BASE_URL` when set.
    pub fn from_env(model_name: impl Into<String>) -> Result<Self, ModelError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ModelError::configuration("OPENAI_API_KEY environment variable not set")
        })?;
        let model = Self::new(model_name, api_key);
        Ok(match std::env::var("OPENAI_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => model.with_base_url(url),
            _ => model,
        })
    }

    /// Create a model served by Ollama, honoring `OLLAMA_BASE_URL` when set.
    #[cfg(feature = "ollama")]
    pub fn ollama(model_name: impl Into<String>) -> Self {
        let base_url = std::env::var("OLLAMA_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| OLLAMA_BASE_URL.to_string());
        let mut model = Self::new(model_name, "ollama").with_base_url(base_url);
        model.system = "ollama";
        model
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the organization ID.
    #[must_use]
    pub fn with_organization(mut self, org: impl Into<String>) -> Self {
        self.organization = Some(org.into());
        self
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Limit the number of generated tokens.
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u64) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, request: &GenerationRequest) -> ResponsesApiRequest {
        ResponsesApiRequest {
            model: self.model_name.clone(),
            input: request.prompt.clone(),
            text: request.output_schema.as_ref().map(|schema| TextConfig {
                format: TextFormat::JsonSchema {
                    name: "output".to_string(),
                    schema: schema.clone(),
                    strict: false,
                },
            }),
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Parse the Responses API response into a generation.
    fn process_response(&self, resp: ResponsesApiResponse) -> Result<Generation, ModelError> {
        if resp.status == ResponseStatus::Failed {
            if let Some(err) = resp.error {
                return Err(ModelError::api_with_code(err.message, err.code));
            }
            return Err(ModelError::api("Response failed with unknown error"));
        }

        let mut parts = Vec::new();

        for output in resp.output {
            match output {
                ResponseOutputItem::Reasoning { summary } => {
                    let content = summary
                        .iter()
                        .map(|s| match s {
                            ReasoningSummaryItem::Text { text } => text.as_str(),
                        })
                        .collect::<Vec<_>>()
                        .join("\n");

                    if !content.is_empty() {
                        parts.push(ContentPart::reasoning(content));
                    }
                }
                ResponseOutputItem::Message { content } => {
                    for item in content {
                        match item {
                            MessageContentItem::Text { text } => {
                                if !text.is_empty() {
                                    parts.push(ContentPart::text(text));
                                }
                            }
                            MessageContentItem::Refusal { refusal } => {
                                return Err(ModelError::ContentFiltered(refusal));
                            }
                        }
                    }
                }
                ResponseOutputItem::FunctionCall { name, arguments } => {
                    let args: JsonValue =
                        serde_json::from_str(&arguments).unwrap_or(serde_json::json!({}));
                    parts.push(ContentPart::tool_call(name, args));
                }
                ResponseOutputItem::Other => {}
            }
        }

        let finish_reason = match resp.status {
            ResponseStatus::Completed if parts.iter().any(|p| matches!(p, ContentPart::ToolCall { .. })) => {
                FinishReason::ToolCall
            }
            ResponseStatus::Completed | ResponseStatus::Cancelled => FinishReason::Stop,
            ResponseStatus::Incomplete => match resp.incomplete_details.as_ref().map(|d| d.reason.as_str()) {
                Some("content_filter") => FinishReason::ContentFilter,
                _ => FinishReason::Length,
            },
            _ => FinishReason::Unknown,
        };

        let mut generation = Generation::from_content(parts, finish_reason)
            .with_model_name(resp.model.unwrap_or_else(|| self.model_name.clone()));
        if let Some(u) = resp.usage {
            generation = generation.with_usage(Usage {
                input_tokens: Some(u.input_tokens),
                output_tokens: Some(u.output_tokens),
                total_tokens: Some(u.total_tokens),
            });
        }
        Ok(generation)
    }

    /// Handle API error response.
    fn handle_error_response(&self, status: u16, body: String) -> ModelError {
        if let Ok(err) = serde_json::from_str::<OpenAIError>(&body) {
            match status {
                401 => return ModelError::auth(err.error.message),
                404 => return ModelError::NotFound(err.error.message),
                _ => {}
            }
        }
        if status == 429 {
            return ModelError::RateLimited { body };
        }

        ModelError::http(status, body)
    }
}

#[async_trait]
impl Model for OpenAIResponsesModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn system(&self) -> &str {
        self.system
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ModelError> {
        let body = self.build_request(request);

        tracing::debug!(
            model = %self.model_name,
            base_url = %self.base_url,
            structured = body.text.is_some(),
            "sending responses request"
        );

        let mut http = self
            .client
            .post(format!("{}/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.default_timeout);

        if let Some(ref org) = self.organization {
            http = http.header("OpenAI-Organization", org);
        }

        let response = http.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout(self.default_timeout)
            } else {
                ModelError::from(e)
            }
        })?;

        let status = response.status().as_u16();
        let raw = response.text().await?;

        if !(200..300).contains(&status) {
            return Err(self.handle_error_response(status, raw));
        }

        let resp: ResponsesApiResponse = serde_json::from_str(&raw)
            .map_err(|e| ModelError::invalid_response_with_body(e.to_string(), raw.clone()))?;

        self.process_response(resp)
    }
}
