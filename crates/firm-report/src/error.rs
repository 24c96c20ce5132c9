//! Error types for report operations

use firm_llm::LLMError;
use thiserror::Error;

/// Report specific errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// Ticker or year range rejected before any request was made
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The model answered without any text body
    #[error("No response from the model")]
    EmptyResponse,

    /// The text body was not valid JSON or lacked required report fields
    #[error("Failed to parse financial report data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Provider or transport failure, carried unchanged
    #[error(transparent)]
    Llm(#[from] LLMError),

    /// Prompt template failed to parse or render
    #[error("Prompt template '{name}' failed: {detail}")]
    Prompt { name: String, detail: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A search was submitted while another one was still loading
    #[error("A search is already in progress")]
    SearchInFlight,
}

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

impl From<firm_utils::ConfigError> for ReportError {
    fn from(err: firm_utils::ConfigError) -> Self {
        ReportError::Config(err.to_string())
    }
}

impl ReportError {
    /// Message shown in the search view's error banner
    pub fn user_message(&self) -> String {
        match self {
            ReportError::EmptyResponse => "No response from the model.".to_string(),
            ReportError::Parse(_) => "Failed to parse financial report data.".to_string(),
            ReportError::Llm(err) => err.to_string(),
            ReportError::InvalidQuery(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}
