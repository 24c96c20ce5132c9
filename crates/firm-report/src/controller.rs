//! Search state machine
//!
//! ```text
//!          begin            finish(Ok)
//!   Idle ---------> Loading ----------> Success
//!    ^   \             |                   |
//!    |    \            | finish(Err)       |
//!    |     \           v                   |
//!    +------ reset -- Error <---- begin ---+
//! ```
//!
//! A new search replaces the whole state. While `Loading`, further
//! submissions are rejected.

use crate::client::ReportClient;
use crate::error::{ReportError, Result};
use crate::model::FinancialReport;
use crate::query::SearchQuery;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Lifecycle phase of the current search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Everything the views render from
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: Option<SearchQuery>,
    phase: Phase,
    error: Option<String>,
    report: Option<Arc<FinancialReport>>,
}

impl SearchState {
    fn loading(query: SearchQuery) -> Self {
        Self {
            query: Some(query),
            phase: Phase::Loading,
            error: None,
            report: None,
        }
    }

    /// Query of the current or last search
    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// User-facing message, set only in `Error`
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Report, set only in `Success`
    pub fn report(&self) -> Option<&FinancialReport> {
        self.report.as_deref()
    }
}

/// Drives one search at a time through the report client
#[derive(Debug)]
pub struct SearchController {
    client: Arc<ReportClient>,
    state: SearchState,
}

impl SearchController {
    pub fn new(client: Arc<ReportClient>) -> Self {
        Self {
            client,
            state: SearchState::default(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn report(&self) -> Option<&FinancialReport> {
        self.state.report()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// Start a search, discarding any previous report or error
    pub fn begin(&mut self, query: SearchQuery) -> Result<()> {
        if self.state.phase == Phase::Loading {
            return Err(ReportError::SearchInFlight);
        }

        debug!(
            ticker = %query.ticker(),
            from = ?self.state.phase,
            "Search started"
        );
        self.state = SearchState::loading(query);
        Ok(())
    }

    /// Record the outcome of the search in flight
    pub fn finish(&mut self, outcome: Result<FinancialReport>) -> Phase {
        if self.state.phase != Phase::Loading {
            warn!(phase = ?self.state.phase, "Ignoring outcome with no search in flight");
            return self.state.phase;
        }

        match outcome {
            Ok(report) => {
                self.state.report = Some(Arc::new(report));
                self.state.phase = Phase::Success;
            }
            Err(err) => {
                self.state.error = Some(err.user_message());
                self.state.phase = Phase::Error;
            }
        }

        debug!(phase = ?self.state.phase, "Search finished");
        self.state.phase
    }

    /// Run one search to completion
    pub async fn submit(&mut self, query: SearchQuery) -> Result<Phase> {
        self.submit_with(query, |_| {}).await
    }

    /// Run one search, calling `on_change` after each transition
    pub async fn submit_with<F>(&mut self, query: SearchQuery, mut on_change: F) -> Result<Phase>
    where
        F: FnMut(&SearchState),
    {
        self.begin(query.clone())?;
        on_change(&self.state);

        let outcome = self.client.analyze(&query).await;
        let phase = self.finish(outcome);
        on_change(&self.state);

        Ok(phase)
    }

    /// Return to the search view, dropping any report
    pub fn reset(&mut self) {
        if self.state.phase == Phase::Loading {
            warn!("Reset requested while a search is in flight");
        }
        debug!(from = ?self.state.phase, "Search reset");
        self.state = SearchState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::aapl_json;
    use crate::testing::{client_once, idle_client, text_response};
    use firm_llm::LLMError;

    fn query(ticker: &str) -> SearchQuery {
        SearchQuery::with_current_year(ticker, 2020, 2024, 2025).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let controller = SearchController::new(idle_client());
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.state().query().is_none());
        assert!(controller.report().is_none());
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_submit_blocking() {
        let mut controller =
            SearchController::new(client_once(Ok(text_response(Some(&aapl_json()), &[]))));
        let phase = tokio_test::block_on(controller.submit(query("AAPL"))).unwrap();
        assert_eq!(phase, Phase::Success);
    }

    #[tokio::test]
    async fn test_success_path() {
        let mut controller =
            SearchController::new(client_once(Ok(text_response(Some(&aapl_json()), &[]))));

        let mut seen = Vec::new();
        let phase = controller
            .submit_with(query("AAPL"), |state| seen.push(state.phase()))
            .await
            .unwrap();

        assert_eq!(seen, [Phase::Loading, Phase::Success]);
        assert_eq!(phase, Phase::Success);
        assert_eq!(controller.report().unwrap().ticker, "AAPL");
        assert!(controller.error().is_none());
        assert_eq!(controller.state().query().unwrap().ticker(), "AAPL");
    }

    #[tokio::test]
    async fn test_non_json_reply_ends_in_error() {
        let mut controller =
            SearchController::new(client_once(Ok(text_response(Some("not json"), &[]))));

        let phase = controller.submit(query("AAPL")).await.unwrap();
        assert_eq!(phase, Phase::Error);
        assert_eq!(
            controller.error(),
            Some("Failed to parse financial report data.")
        );
        assert!(controller.report().is_none());
    }

    #[tokio::test]
    async fn test_empty_reply_message() {
        let mut controller = SearchController::new(client_once(Ok(text_response(None, &[]))));

        controller.submit(query("AAPL")).await.unwrap();
        assert_eq!(controller.phase(), Phase::Error);
        assert_eq!(controller.error(), Some("No response from the model."));
    }

    #[tokio::test]
    async fn test_provider_message_shown_unchanged() {
        let mut controller = SearchController::new(client_once(Err(LLMError::RateLimitExceeded(
            "Resource has been exhausted".to_string(),
        ))));

        controller.submit(query("AAPL")).await.unwrap();
        assert_eq!(
            controller.error(),
            Some("Rate limit exceeded: Resource has been exhausted")
        );
    }

    #[tokio::test]
    async fn test_auth_message_reaches_banner() {
        let mut controller = SearchController::new(client_once(Err(
            LLMError::AuthenticationFailed(
                "API key not valid. Please pass a valid API key.".to_string(),
            ),
        )));

        controller.submit(query("AAPL")).await.unwrap();
        assert_eq!(controller.phase(), Phase::Error);
        assert_eq!(
            controller.error(),
            Some("Authentication failed: API key not valid. Please pass a valid API key.")
        );
    }

    #[test]
    fn test_begin_rejected_while_loading() {
        let mut controller = SearchController::new(idle_client());

        controller.begin(query("AAPL")).unwrap();
        let err = controller.begin(query("MSFT")).unwrap_err();
        assert!(matches!(err, ReportError::SearchInFlight));
        assert_eq!(controller.state().query().unwrap().ticker(), "AAPL");

        controller.finish(Err(ReportError::EmptyResponse));
        assert_eq!(controller.phase(), Phase::Error);
        assert!(controller.begin(query("MSFT")).is_ok());
    }

    #[test]
    fn test_new_search_replaces_state() {
        let mut controller = SearchController::new(idle_client());

        controller.begin(query("AAPL")).unwrap();
        let report = serde_json::from_str(&aapl_json()).unwrap();
        assert_eq!(controller.finish(Ok(report)), Phase::Success);

        controller.begin(query("VNM")).unwrap();
        assert_eq!(controller.phase(), Phase::Loading);
        assert!(controller.report().is_none());
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_finish_without_search_is_ignored() {
        let mut controller = SearchController::new(idle_client());

        assert_eq!(controller.finish(Err(ReportError::EmptyResponse)), Phase::Idle);
        assert!(controller.error().is_none());
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let mut controller =
            SearchController::new(client_once(Ok(text_response(Some(&aapl_json()), &[]))));

        controller.submit(query("AAPL")).await.unwrap();
        assert_eq!(controller.phase(), Phase::Success);

        controller.reset();
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.report().is_none());
        assert!(controller.state().query().is_none());
    }
}
