//! Report client
//!
//! Issues exactly one grounded, schema-constrained completion request per
//! search and turns the reply into a [`FinancialReport`]. There is no retry
//! and no caching: asking twice means two requests.

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::model::FinancialReport;
use crate::prompts;
use crate::query::SearchQuery;
use firm_llm::providers::{GeminiConfig, GeminiProvider};
use firm_llm::{CompletionRequest, LLMProvider, Message, ResponseFormat};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Client turning a [`SearchQuery`] into a [`FinancialReport`]
pub struct ReportClient {
    provider: Arc<dyn LLMProvider>,
    config: ReportConfig,
}

impl ReportClient {
    /// Create a client over any provider
    pub fn new(provider: Arc<dyn LLMProvider>, config: ReportConfig) -> Self {
        Self { provider, config }
    }

    /// Create a client backed by Gemini
    pub fn gemini(gemini: GeminiConfig, config: ReportConfig) -> Result<Self> {
        config.validate()?;
        let provider = GeminiProvider::with_config(gemini)?;
        Ok(Self::new(Arc::new(provider), config))
    }

    /// Get the configuration
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Build the single completion request for `query`
    pub fn build_request(&self, query: &SearchQuery) -> Result<CompletionRequest> {
        let system = prompts::analysis_instruction(query.start_year(), query.end_year())?;
        let user = prompts::analysis_request(query.ticker(), query.start_year(), query.end_year())?;

        Ok(CompletionRequest::builder(&self.config.model)
            .system(system)
            .add_message(Message::user(user))
            .search_grounding(true)
            .response_format(ResponseFormat::json(prompts::report_schema()))
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_output_tokens)
            .build())
    }

    /// Validate the inputs, then analyze
    pub async fn analyze_ticker(
        &self,
        ticker: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<FinancialReport> {
        let query = SearchQuery::new(ticker, start_year, end_year)?;
        self.analyze(&query).await
    }

    /// Request and parse the report for `query`
    #[instrument(
        skip(self, query),
        fields(
            ticker = %query.ticker(),
            start = query.start_year(),
            end = query.end_year(),
            provider = self.provider.name(),
        )
    )]
    pub async fn analyze(&self, query: &SearchQuery) -> Result<FinancialReport> {
        let request = self.build_request(query)?;
        info!(model = %request.model, "Requesting financial report");

        let response = self.provider.complete(request).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            total_tokens = response.usage.total(),
            stop_reason = ?response.stop_reason,
            "Token usage"
        );

        let text = response.message.text().ok_or(ReportError::EmptyResponse)?;
        let mut report = parse_report(text)?;

        if self.config.merge_grounding_sources {
            let added = report.merge_sources(response.grounding_sources.iter().map(|s| s.uri.as_str()));
            if added > 0 {
                debug!(added, "Merged grounding sources into report");
            }
        }

        info!(
            company = %report.company_name,
            periods = report.periods.len(),
            "Financial report ready"
        );
        Ok(report)
    }
}

impl fmt::Debug for ReportClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportClient")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Parse the model's JSON reply
pub fn parse_report(text: &str) -> Result<FinancialReport> {
    serde_json::from_str(text).map_err(|e| {
        warn!(
            line = e.line(),
            column = e.column(),
            error = %e,
            "Reply is not a valid financial report"
        );
        ReportError::Parse(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::aapl_json;
    use crate::testing::{MockProvider, client_once, text_response};
    use firm_llm::LLMError;
    use firm_llm::completion::JSON_MIME_TYPE;

    fn aapl_query() -> SearchQuery {
        SearchQuery::with_current_year("AAPL", 2020, 2024, 2025).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let client = ReportClient::new(Arc::new(MockProvider::new()), ReportConfig::default());
        let request = client.build_request(&aapl_query()).unwrap();

        assert_eq!(request.model, "gemini-3-pro-preview");
        assert!(request.search_grounding);
        assert_eq!(request.messages.len(), 1);

        let user = request.messages[0].text().unwrap();
        assert!(user.contains("AAPL"));
        assert!(user.contains("2020 to 2024"));

        let system = request.system.as_deref().unwrap();
        assert!(system.contains("From 2020 to 2024 (5 years)"));

        let format = request.response_format.as_ref().unwrap();
        assert_eq!(format.mime_type, JSON_MIME_TYPE);
        assert_eq!(format.schema.as_ref().unwrap()["type"], "OBJECT");

        assert!(request.temperature.is_none());
        assert!(request.max_tokens.is_none());
    }

    #[test]
    fn test_request_uses_configured_sampling() {
        let config = ReportConfig::builder()
            .model("gemini-2.5-pro")
            .temperature(0.1)
            .max_output_tokens(16_384)
            .build()
            .unwrap();
        let client = ReportClient::new(Arc::new(MockProvider::new()), config);
        let request = client.build_request(&aapl_query()).unwrap();

        assert_eq!(request.model, "gemini-2.5-pro");
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.max_tokens, Some(16_384));
    }

    #[tokio::test]
    async fn test_analyze_sends_one_request() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .withf(|request| {
                request.search_grounding
                    && request.response_format.is_some()
                    && request.messages[0].text().is_some_and(|t| t.contains("VNM"))
            })
            .times(1)
            .returning(|_| Ok(text_response(Some(&aapl_json()), &[])));

        let client = ReportClient::new(Arc::new(provider), ReportConfig::default());
        let query = SearchQuery::with_current_year("VNM", 2020, 2024, 2025).unwrap();
        assert!(client.analyze(&query).await.is_ok());
    }

    #[tokio::test]
    async fn test_well_formed_reply_copied_unchanged() {
        let client = client_once(Ok(text_response(Some(&aapl_json()), &[])));
        let report = client.analyze(&aapl_query()).await.unwrap();

        let expected: FinancialReport = serde_json::from_str(&aapl_json()).unwrap();
        assert_eq!(report, expected);
        assert_eq!(report.periods.len(), 7);
    }

    #[tokio::test]
    async fn test_grounding_sources_merged_after_model_sources() {
        let client = client_once(Ok(text_response(
            Some(&aapl_json()),
            &[
                "https://www.sec.gov/cgi-bin/browse-edgar?company=apple",
                "https://investor.apple.com/sec-filings",
            ],
        )));
        let report = client.analyze(&aapl_query()).await.unwrap();

        assert_eq!(
            report.sources,
            [
                "https://www.sec.gov/cgi-bin/browse-edgar?company=apple",
                "https://investor.apple.com/sec-filings",
            ]
        );
    }

    #[tokio::test]
    async fn test_grounding_merge_can_be_disabled() {
        let config = ReportConfig::builder()
            .merge_grounding_sources(false)
            .build()
            .unwrap();
        let provider = crate::testing::provider_once(Ok(text_response(
            Some(&aapl_json()),
            &["https://investor.apple.com/sec-filings"],
        )));
        let client = ReportClient::new(Arc::new(provider), config);
        let report = client.analyze(&aapl_query()).await.unwrap();

        assert_eq!(report.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply() {
        let client = client_once(Ok(text_response(None, &[])));
        let err = client.analyze(&aapl_query()).await.unwrap_err();
        assert!(matches!(err, ReportError::EmptyResponse));

        let client = client_once(Ok(text_response(Some("   "), &[])));
        let err = client.analyze(&aapl_query()).await.unwrap_err();
        assert!(matches!(err, ReportError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_non_json_reply() {
        let client = client_once(Ok(text_response(Some("I could not find data."), &[])));
        let err = client.analyze(&aapl_query()).await.unwrap_err();
        assert!(matches!(err, ReportError::Parse(_)));
    }

    #[tokio::test]
    async fn test_reply_missing_required_field() {
        let client = client_once(Ok(text_response(
            Some(r#"{"companyName": "Apple", "periods": []}"#),
            &[],
        )));
        let err = client.analyze(&aapl_query()).await.unwrap_err();
        assert!(matches!(err, ReportError::Parse(_)));
    }

    #[tokio::test]
    async fn test_transport_error_propagated() {
        let client = client_once(Err(LLMError::AuthenticationFailed(
            "API key not valid".to_string(),
        )));
        let err = client.analyze(&aapl_query()).await.unwrap_err();

        match err {
            ReportError::Llm(LLMError::AuthenticationFailed(msg)) => {
                assert_eq!(msg, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_analyze_ticker_validates_first() {
        let client = ReportClient::new(Arc::new(MockProvider::new()), ReportConfig::default());
        let err = client.analyze_ticker(" ", 2020, 2024).await.unwrap_err();
        assert!(matches!(err, ReportError::InvalidQuery(_)));
    }

    #[test]
    fn test_gemini_client_requires_key() {
        let result = ReportClient::gemini(GeminiConfig::new(""), ReportConfig::default());
        assert!(matches!(
            result,
            Err(ReportError::Llm(LLMError::ConfigurationError(_)))
        ));

        let client =
            ReportClient::gemini(GeminiConfig::new("test-key"), ReportConfig::default()).unwrap();
        assert_eq!(client.provider_name(), "gemini");
        assert!(format!("{client:?}").contains("gemini-3-pro-preview"));
    }
}
