//! Loading indicator shown while a report is requested

use crate::query::SearchQuery;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const LOADING_TITLE: &str = "Analyzing Financial Statements";

pub const LOADING_DETAIL: &str = "Searching for the latest 10-K/10-Q data, performing vertical & horizontal analysis, and generating your report...";

/// One-line message naming the search in flight
pub fn loading_message(query: Option<&SearchQuery>) -> String {
    match query {
        Some(query) => format!(
            "{LOADING_TITLE}: {} {}-{}",
            query.ticker(),
            query.start_year(),
            query.end_year()
        ),
        None => LOADING_TITLE.to_string(),
    }
}

/// Spinner ticking on a background thread until finished
#[derive(Debug)]
pub struct LoadingSpinner {
    bar: ProgressBar,
}

impl LoadingSpinner {
    /// Start ticking; drawn on stderr and hidden when it is not a terminal
    pub fn start(query: Option<&SearchQuery>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}\n  {prefix:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
        );
        bar.set_message(loading_message(query));
        bar.set_prefix(LOADING_DETAIL);
        bar.enable_steady_tick(Duration::from_millis(90));
        Self { bar }
    }

    /// Stop and erase the spinner
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
