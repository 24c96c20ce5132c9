//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error (connect, timeout, body read)
    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<firm_utils::ConfigError> for LLMError {
    fn from(err: firm_utils::ConfigError) -> Self {
        Self::ConfigurationError(err.to_string())
    }
}

impl LLMError {
    /// Map a non-success HTTP status and body to an error
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        match status {
            400 => Self::InvalidRequest(body),
            401 | 403 => Self::AuthenticationFailed(body),
            404 => Self::ModelNotFound(model.to_string()),
            429 => Self::RateLimitExceeded(body),
            _ => Self::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            LLMError::from_status(400, "bad".into(), "m"),
            LLMError::InvalidRequest(body) if body == "bad"
        ));
        assert!(matches!(
            LLMError::from_status(403, "API key not valid".into(), "m"),
            LLMError::AuthenticationFailed(body) if body == "API key not valid"
        ));
        assert!(matches!(
            LLMError::from_status(404, String::new(), "gemini-x"),
            LLMError::ModelNotFound(model) if model == "gemini-x"
        ));
        assert!(matches!(
            LLMError::from_status(429, "quota".into(), "m"),
            LLMError::RateLimitExceeded(_)
        ));

        let err = LLMError::from_status(503, "overloaded".into(), "m");
        assert_eq!(err.to_string(), "API request failed: HTTP 503: overloaded");
    }
}
