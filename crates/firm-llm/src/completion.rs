//! Completion request and response types

use crate::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MIME type asking the model for a bare JSON document
pub const JSON_MIME_TYPE: &str = "application/json";

/// Constraint on the shape of the model's reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Response MIME type (e.g. `application/json`)
    pub mime_type: String,

    /// Schema the reply must follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl ResponseFormat {
    /// JSON output constrained to `schema`
    pub fn json(schema: Value) -> Self {
        Self {
            mime_type: JSON_MIME_TYPE.to_string(),
            schema: Some(schema),
        }
    }
}

/// Request for LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// Conversation history
    pub messages: Vec<Message>,

    /// Optional system instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Maximum tokens to generate; provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Sampling temperature (0.0-2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Let the model ground its answer in live web search results
    #[serde(default)]
    pub search_grounding: bool,

    /// Constrained output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// A web page the provider reports as grounding for its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    /// Page URL
    pub uri: String,

    /// Page title, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated message from the assistant
    pub message: Message,

    /// Why the model stopped generating
    pub stop_reason: StopReason,

    /// Token usage statistics
    pub usage: TokenUsage,

    /// Web sources used for grounding (empty without grounding)
    #[serde(default)]
    pub grounding_sources: Vec<GroundingSource>,
}

/// Reason the LLM stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural completion (end of turn)
    EndTurn,

    /// Hit max tokens limit
    MaxTokens,

    /// Stop sequence encountered
    StopSequence,

    /// Blocked by a safety or recitation filter
    Blocked,

    /// Anything the provider reports that has no mapping
    Other,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens
    pub input_tokens: usize,

    /// Number of output tokens
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

impl CompletionRequest {
    /// Create a builder for completion requests
    pub fn builder(model: impl Into<String>) -> CompletionRequestBuilder {
        CompletionRequestBuilder::new(model)
    }
}

/// Builder for CompletionRequest
#[derive(Debug)]
pub struct CompletionRequestBuilder {
    model: String,
    messages: Vec<Message>,
    system: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    search_grounding: bool,
    response_format: Option<ResponseFormat>,
}

impl CompletionRequestBuilder {
    /// Create a new builder
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            system: None,
            max_tokens: None,
            temperature: None,
            search_grounding: false,
            response_format: None,
        }
    }

    /// Add a single message
    pub fn add_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Set the system instruction
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the maximum tokens
    pub fn max_tokens(mut self, max_tokens: Option<usize>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Enable or disable web-search grounding
    pub fn search_grounding(mut self, enabled: bool) -> Self {
        self.search_grounding = enabled;
        self
    }

    /// Constrain the reply format
    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Build the completion request
    pub fn build(self) -> CompletionRequest {
        CompletionRequest {
            model: self.model,
            messages: self.messages,
            system: self.system,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            search_grounding: self.search_grounding,
            response_format: self.response_format,
        }
    }
}
