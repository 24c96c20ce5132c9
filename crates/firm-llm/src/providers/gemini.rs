//! Google Gemini provider implementation
//!
//! Implements [`LLMProvider`] on top of the `generateContent` endpoint.
//! See: https://ai.google.dev/api/generate-content
//!
//! # Example
//!
//! ```no_run
//! use firm_llm::providers::{GeminiConfig, GeminiProvider};
//! use firm_llm::{CompletionRequest, LLMProvider, Message};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = GeminiProvider::with_config(GeminiConfig::new("key").with_timeout(60))?;
//!
//! let request = CompletionRequest::builder("gemini-2.5-flash")
//!     .add_message(Message::user("Summarise AAPL's last annual report"))
//!     .search_grounding(true)
//!     .build();
//!
//! let response = provider.complete(request).await?;
//! println!("{}", response.message.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, GroundingSource, LLMError, LLMProvider, Message,
    Result, Role, StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 180;
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for the Gemini provider
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL of the API (default: "https://generativelanguage.googleapis.com/v1beta")
    pub api_base: String,

    /// Request timeout in seconds (default: 180)
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    /// `GEMINI_API_BASE` overrides the endpoint when set.
    pub fn from_env() -> Result<Self> {
        let api_key = firm_utils::env_var("GEMINI_API_KEY")
            .or_else(|| firm_utils::env_var("API_KEY"))
            .ok_or_else(|| {
                LLMError::ConfigurationError(
                    "GEMINI_API_KEY environment variable not set".to_string(),
                )
            })?;

        let mut config = Self::new(api_key);
        if let Some(api_base) = firm_utils::env_var("GEMINI_API_BASE") {
            config.api_base = api_base;
        }
        if let Some(timeout) = firm_utils::env_parse::<u64>("FIRM_REQUEST_TIMEOUT_SECS")? {
            config.timeout_secs = timeout;
        }
        Ok(config)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{model}:generateContent", self.api_base)
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Google Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Gemini API key must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with an API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model, grounded = request.search_grounding))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to Gemini API at {}", self.config.api_base);

        let url = self.config.endpoint(&request.model);
        let model = request.model.clone();
        let gemini_request = GenerateContentRequest::from(request);

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&gemini_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            warn!(status = status.as_u16(), "Gemini API returned an error");
            return Err(LLMError::from_status(status.as_u16(), error_detail(&body), &model));
        }

        let gemini_response: GenerateContentResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        if let Some(reason) = gemini_response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(LLMError::InvalidRequest(format!(
                "Prompt blocked by Gemini: {reason}"
            )));
        }

        let usage = gemini_response
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        let Some(candidate) = gemini_response.candidates.into_iter().next() else {
            debug!("Gemini returned no candidates");
            return Ok(CompletionResponse {
                message: Message::empty_assistant(),
                stop_reason: StopReason::Other,
                usage,
                grounding_sources: Vec::new(),
            });
        };

        let stop_reason = map_finish_reason(candidate.finish_reason.as_deref());
        let grounding_sources = candidate
            .grounding_metadata
            .map(GroundingMetadata::into_sources)
            .unwrap_or_default();

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text)
            .collect();

        debug!(
            "Received response - stop_reason: {:?}, tokens: {}/{}, grounding sources: {}",
            stop_reason,
            usage.input_tokens,
            usage.output_tokens,
            grounding_sources.len()
        );

        Ok(CompletionResponse {
            message: Message {
                role: Role::Assistant,
                content: (!text.is_empty()).then_some(text),
            },
            stop_reason,
            usage,
            grounding_sources,
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

fn map_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("STOP") | None => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            StopReason::Blocked
        }
        Some(other) => {
            debug!("Unknown finish reason: {other}");
            StopReason::Other
        }
    }
}

/// Pull `error.message` out of a Gemini error body, falling back to the raw text
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// Gemini-specific request/response types
// These match the generateContent wire format

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl From<CompletionRequest> for GenerateContentRequest {
    fn from(request: CompletionRequest) -> Self {
        let contents = request
            .messages
            .into_iter()
            .filter_map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                    // System text travels in systemInstruction
                    Role::System => return None,
                };
                m.content.map(|text| Content {
                    role: Some(role.to_string()),
                    parts: vec![Part { text }],
                })
            })
            .collect();

        let system_instruction = request.system.map(|text| Content {
            role: None,
            parts: vec![Part { text }],
        });

        let tools = if request.search_grounding {
            vec![GeminiTool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        let generation_config = GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
            response_mime_type: request.response_format.as_ref().map(|f| f.mime_type.clone()),
            response_schema: request.response_format.and_then(|f| f.schema),
        };

        Self {
            contents,
            system_instruction,
            tools,
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.max_output_tokens.is_none()
            && self.response_mime_type.is_none()
            && self.response_schema.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

impl GroundingMetadata {
    fn into_sources(self) -> Vec<GroundingSource> {
        let mut sources: Vec<GroundingSource> = Vec::new();
        for web in self.grounding_chunks.into_iter().filter_map(|c| c.web) {
            let Some(uri) = web.uri else { continue };
            if sources.iter().all(|s| s.uri != uri) {
                sources.push(GroundingSource {
                    uri,
                    title: web.title,
                });
            }
        }
        sources
    }
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
