//! Grounded financial-statement reports
//!
//! This crate turns a ticker and a year range into a rendered financial
//! report. It includes:
//!
//! - The report data model (periods, analysis sections, the report itself)
//! - The system instruction, user message and strict response schema sent
//!   to the model
//! - [`ReportClient`], which issues one grounded, schema-constrained
//!   request and parses the reply
//! - [`SearchController`], the idle/loading/success/error state machine
//! - Terminal views: search form, loading spinner and the report with its
//!   charts, tables and narrative sections
//!
//! # Architecture
//!
//! ```text
//! SearchQuery -> SearchController -> ReportClient -> LLMProvider (Gemini)
//!                      |                                   |
//!                 SearchState  <------ FinancialReport <---+
//!                      |
//!                  Dashboard (search | loading | report views)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use firm_llm::providers::GeminiConfig;
//! use firm_report::{ReportClient, ReportConfig, SearchController, SearchQuery};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ReportClient::gemini(GeminiConfig::from_env()?, ReportConfig::default())?;
//!     let mut controller = SearchController::new(Arc::new(client));
//!
//!     controller.submit(SearchQuery::new("AAPL", 2020, 2024)?).await?;
//!     if let Some(report) = controller.report() {
//!         println!("{} has {} periods", report.company_name, report.periods.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod prompts;
pub mod query;
pub mod view;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use client::ReportClient;
pub use config::ReportConfig;
pub use controller::{Phase, SearchController, SearchState};
pub use error::{ReportError, Result};
pub use model::{AnalysisSection, FinancialPeriod, FinancialReport, Granularity};
pub use query::SearchQuery;
pub use view::{Dashboard, View};
