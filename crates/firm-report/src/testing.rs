//! Test doubles shared by the client, controller and view tests

use crate::client::ReportClient;
use crate::config::ReportConfig;
use async_trait::async_trait;
use firm_llm::{
    CompletionRequest, CompletionResponse, GroundingSource, LLMProvider, Message, StopReason,
    TokenUsage,
};
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Provider {}

    #[async_trait]
    impl LLMProvider for Provider {
        async fn complete(&self, request: CompletionRequest) -> firm_llm::Result<CompletionResponse>;
        fn name(&self) -> &'static str;
    }
}

/// Successful response carrying `text` and the given grounding URLs
pub fn text_response(text: Option<&str>, grounding: &[&str]) -> CompletionResponse {
    CompletionResponse {
        message: match text {
            Some(text) => Message::assistant(text),
            None => Message::empty_assistant(),
        },
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage {
            input_tokens: 1200,
            output_tokens: 3400,
        },
        grounding_sources: grounding
            .iter()
            .map(|uri| GroundingSource {
                uri: (*uri).to_string(),
                title: None,
            })
            .collect(),
    }
}

/// Provider expecting exactly one call that yields `outcome`
pub fn provider_once(outcome: firm_llm::Result<CompletionResponse>) -> MockProvider {
    let mut provider = MockProvider::new();
    provider.expect_name().return_const("mock");
    provider
        .expect_complete()
        .times(1)
        .return_once(move |_| outcome);
    provider
}

/// Client over a provider expecting exactly one call that yields `outcome`
pub fn client_once(outcome: firm_llm::Result<CompletionResponse>) -> Arc<ReportClient> {
    Arc::new(ReportClient::new(
        Arc::new(provider_once(outcome)),
        ReportConfig::default(),
    ))
}

/// Client whose provider must never be called
pub fn idle_client() -> Arc<ReportClient> {
    let mut provider = MockProvider::new();
    provider.expect_name().return_const("mock");
    provider.expect_complete().never();
    Arc::new(ReportClient::new(Arc::new(provider), ReportConfig::default()))
}
