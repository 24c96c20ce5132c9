//! Terminal views
//!
//! Exactly one view is shown at a time and it is chosen from the
//! controller's [`SearchState`] alone. [`Dashboard`] keeps the
//! presentation-only state that outlives a single render: the year range
//! in the search form and the chart granularity toggle.

pub mod chart;
pub mod format;
pub mod loading;
pub mod markdown;
pub mod report;
pub mod search;

pub use chart::{GranularitySelector, available_granularities, chart_periods, margins, return_ratios};
pub use format::{Palette, format_number, source_host};
pub use loading::{LoadingSpinner, loading_message};
pub use markdown::render_markdown;
pub use report::{ReportLayout, render_report};
pub use search::SearchView;

use crate::controller::{Phase, SearchState};
use crate::error::Result;
use crate::model::{FinancialReport, Granularity};
use crate::query::{self, SearchQuery, TRENDING_TICKERS};

/// The view selected by the current state
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    /// Search form, with the banner text after a failed search
    Search { error: Option<&'a str> },
    /// Request in flight
    Loading { query: Option<&'a SearchQuery> },
    /// Finished report
    Report(&'a FinancialReport),
}

impl<'a> View<'a> {
    pub fn for_state(state: &'a SearchState) -> Self {
        match state.phase() {
            Phase::Idle => View::Search { error: None },
            Phase::Error => View::Search {
                error: state.error(),
            },
            Phase::Loading => View::Loading {
                query: state.query(),
            },
            Phase::Success => match state.report() {
                Some(report) => View::Report(report),
                None => View::Search { error: None },
            },
        }
    }
}

/// Renders whichever view the state selects
#[derive(Debug, Clone)]
pub struct Dashboard {
    layout: ReportLayout,
    current_year: i32,
    start_year: i32,
    end_year: i32,
    selector: GranularitySelector,
}

impl Dashboard {
    pub fn new(layout: ReportLayout) -> Self {
        Self::with_current_year(layout, query::current_year())
    }

    pub fn with_current_year(layout: ReportLayout, current_year: i32) -> Self {
        let (start_year, end_year) = query::default_range(current_year);
        Self {
            layout,
            current_year,
            start_year,
            end_year,
            selector: GranularitySelector::default(),
        }
    }

    /// Year range used for new searches
    pub fn range(&self) -> (i32, i32) {
        (self.start_year, self.end_year)
    }

    pub fn set_range(&mut self, start_year: i32, end_year: i32) -> Result<()> {
        query::validate_range(start_year, end_year, self.current_year)?;
        self.start_year = start_year;
        self.end_year = end_year;
        Ok(())
    }

    /// Query for `ticker` over the current range
    pub fn query_for(&self, ticker: &str) -> Result<SearchQuery> {
        SearchQuery::with_current_year(ticker, self.start_year, self.end_year, self.current_year)
    }

    /// Trending ticker by its 1-based position
    pub fn trending(&self, position: usize) -> Option<&'static str> {
        position
            .checked_sub(1)
            .and_then(|i| TRENDING_TICKERS.get(i))
            .copied()
    }

    /// Choose the chart granularity; false when the report lacks it
    pub fn select_granularity(&mut self, granularity: Granularity) -> bool {
        self.selector.select(granularity)
    }

    /// Chart granularity to use whenever a report offers it
    pub fn prefer_granularity(&mut self, granularity: Granularity) {
        self.selector.prefer(granularity);
    }

    pub fn selector(&self) -> &GranularitySelector {
        &self.selector
    }

    /// Render the view for `state`
    pub fn render(&mut self, state: &SearchState) -> String {
        match View::for_state(state) {
            View::Search { error } => SearchView {
                error,
                start_year: self.start_year,
                end_year: self.end_year,
                current_year: self.current_year,
            }
            .render(self.layout.palette),
            View::Loading { query } => format!(
                "{}\n{}\n",
                loading_message(query),
                self.layout.palette.muted(loading::LOADING_DETAIL)
            ),
            View::Report(report) => {
                self.selector.refresh(&report.periods);
                render_report(report, &self.selector, &self.layout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SearchController;
    use crate::model::fixtures::aapl_json;
    use crate::testing::{client_once, idle_client, text_response};

    fn dashboard() -> Dashboard {
        Dashboard::with_current_year(
            ReportLayout {
                palette: Palette::plain(),
                width: 140,
                chart_width: 20,
            },
            2025,
        )
    }

    #[test]
    fn test_idle_shows_search() {
        let controller = SearchController::new(idle_client());
        assert!(matches!(
            View::for_state(controller.state()),
            View::Search { error: None }
        ));

        let text = dashboard().render(controller.state());
        assert!(text.contains("Period: 2021 - 2025"));
    }

    #[test]
    fn test_loading_view_has_no_report() {
        let mut controller = SearchController::new(idle_client());
        let dashboard = dashboard();
        controller.begin(dashboard.query_for("MSFT").unwrap()).unwrap();

        let view = View::for_state(controller.state());
        assert!(matches!(view, View::Loading { query: Some(q) } if q.ticker() == "MSFT"));

        let mut dashboard = dashboard;
        let text = dashboard.render(controller.state());
        assert!(text.starts_with("Analyzing Financial Statements: MSFT 2021-2025"));
    }

    #[test]
    fn test_range_and_trending() {
        let mut dashboard = dashboard();
        assert_eq!(dashboard.range(), (2021, 2025));
        assert!(dashboard.set_range(2015, 2020).is_ok());
        assert_eq!(dashboard.query_for("AAPL").unwrap().start_year(), 2015);
        assert!(dashboard.set_range(2020, 2015).is_err());
        assert!(dashboard.set_range(1985, 2020).is_err());
        assert_eq!(dashboard.range(), (2015, 2020));

        assert_eq!(dashboard.trending(1), Some("AAPL"));
        assert_eq!(dashboard.trending(6), Some("VNM"));
        assert_eq!(dashboard.trending(0), None);
        assert_eq!(dashboard.trending(8), None);
    }

    #[tokio::test]
    async fn test_error_state_shows_banner() {
        let mut controller =
            SearchController::new(client_once(Ok(text_response(Some("<html>"), &[]))));
        let mut dashboard = dashboard();

        controller
            .submit(dashboard.query_for("AAPL").unwrap())
            .await
            .unwrap();
        let text = dashboard.render(controller.state());
        assert!(text.contains("❌ Error: Failed to parse financial report data."));
        assert!(text.contains("Trending:"));
    }

    #[tokio::test]
    async fn test_end_to_end_aapl() {
        let mut controller =
            SearchController::new(client_once(Ok(text_response(Some(&aapl_json()), &[]))));
        let mut dashboard = dashboard();
        dashboard.set_range(2020, 2024).unwrap();

        let mut phases = Vec::new();
        controller
            .submit_with(dashboard.query_for("AAPL").unwrap(), |state| {
                phases.push(state.phase());
            })
            .await
            .unwrap();
        assert_eq!(phases, [Phase::Loading, Phase::Success]);

        let text = dashboard.render(controller.state());
        assert!(text.contains("AAPL"));
        assert_eq!(dashboard.selector().active(), Some(Granularity::Year));

        let table = &text[text.find("Historical Data").unwrap()..];
        let yearly: Vec<usize> = (2020..=2024)
            .map(|year| table.find(&format!("│ {year} ")).unwrap())
            .collect();
        assert_eq!(yearly.len(), 5);
        assert!(yearly.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_granularity_falls_back_on_new_report() {
        let monthly = serde_json::json!({
            "companyName": "Vinamilk",
            "ticker": "VNM",
            "reportingUnit": "Billion VND",
            "periods": [
                {"periodLabel": "2024", "type": "year", "year": "2024", "revenue": 61783, "grossProfit": 25841, "netIncome": 9453},
                {"periodLabel": "Jan 2025", "type": "month", "year": "2025", "revenue": 4700, "grossProfit": 1900, "netIncome": 700}
            ],
            "verticalAnalysis": {},
            "horizontalAnalysis": {},
            "executiveSummary": "Stable."
        })
        .to_string();

        let mut dashboard = dashboard();
        let mut controller =
            SearchController::new(client_once(Ok(text_response(Some(&monthly), &[]))));
        controller.submit(dashboard.query_for("VNM").unwrap()).await.unwrap();
        dashboard.render(controller.state());
        assert!(dashboard.select_granularity(Granularity::Month));

        let mut controller =
            SearchController::new(client_once(Ok(text_response(Some(&aapl_json()), &[]))));
        controller.submit(dashboard.query_for("AAPL").unwrap()).await.unwrap();
        let text = dashboard.render(controller.state());

        assert_eq!(dashboard.selector().active(), Some(Granularity::Year));
        assert!(text.contains("Revenue & Net Income Trend (Yearly)"));
    }
}
