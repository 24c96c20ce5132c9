//! LLM provider abstraction layer for firm-analyst
//!
//! This crate provides the provider-agnostic pieces needed to ask a hosted
//! model for a structured answer:
//!
//! - Message types for the conversation
//! - Completion request/response types, including web-search grounding and
//!   a constrained response format (MIME type plus JSON schema)
//! - Schema helpers producing the OpenAPI-subset dialect Gemini accepts
//! - The [`LLMProvider`] trait
//! - A Gemini implementation (behind the `gemini` feature)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod schema;

// Re-export main types
pub use completion::{
    CompletionRequest, CompletionResponse, GroundingSource, ResponseFormat, StopReason, TokenUsage,
};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
