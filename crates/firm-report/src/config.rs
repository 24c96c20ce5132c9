//! Configuration for report requests

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Configuration for report requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Model identifier sent to the provider
    pub model: String,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Output token cap; provider default when unset
    pub max_output_tokens: Option<usize>,

    /// Append grounding URLs the model left out of its own `sources`
    pub merge_grounding_sources: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_output_tokens: None,
            merge_grounding_sources: true,
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ReportError::Config("model must not be empty".to_string()));
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ReportError::Config(format!(
                    "temperature must be within 0.0-2.0, got {temperature}"
                )));
            }
        }

        if self.max_output_tokens == Some(0) {
            return Err(ReportError::Config(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ReportConfig
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_output_tokens: Option<usize>,
    merge_grounding_sources: Option<bool>,
}

impl ReportConfigBuilder {
    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Take the model from `GEMINI_MODEL` when set
    pub fn env_model(mut self) -> Self {
        if let Some(model) = firm_utils::env_var("GEMINI_MODEL") {
            self.model = Some(model);
        }
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token cap
    pub fn max_output_tokens(mut self, max_tokens: usize) -> Self {
        self.max_output_tokens = Some(max_tokens);
        self
    }

    /// Enable or disable merging grounding URLs into the report sources
    pub fn merge_grounding_sources(mut self, enabled: bool) -> Self {
        self.merge_grounding_sources = Some(enabled);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ReportConfig> {
        let defaults = ReportConfig::default();

        let config = ReportConfig {
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            merge_grounding_sources: self
                .merge_grounding_sources
                .unwrap_or(defaults.merge_grounding_sources),
        };

        config.validate()?;
        Ok(config)
    }
}
