//! Search form: title, year range, trending tickers and the error banner

use super::format::Palette;
use crate::query::{MIN_YEAR, TRENDING_TICKERS};

const FEATURES: [(&str, &str); 3] = [
    (
        "Search Grounding",
        "Acquire data and information from financial statements and real-time news.",
    ),
    (
        "Automated Analysis",
        "Performs vertical and horizontal analysis automatically on retrieved financial data.",
    ),
    (
        "Visual Insights",
        "Charts and margin trends to spot opportunities instantly.",
    ),
];

/// Everything the search form shows
#[derive(Debug, Clone, Copy)]
pub struct SearchView<'a> {
    pub error: Option<&'a str>,
    pub start_year: i32,
    pub end_year: i32,
    pub current_year: i32,
}

impl SearchView<'_> {
    pub fn render(&self, palette: Palette) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", palette.title("Firm Analysis Assistant")));
        output.push_str(
            "Provide quick overall information on a listed firm's financial status \
             with automated analysis and visualizations.\n\n",
        );

        output.push_str(&format!(
            "Period: {} - {}  {}\n",
            self.start_year,
            self.end_year,
            palette.muted(&format!("(years {MIN_YEAR}-{})", self.current_year)),
        ));
        output.push_str("Enter a ticker symbol (e.g., AAPL, VNM), optionally followed by start and end years.\n\n");

        let trending: Vec<String> = TRENDING_TICKERS
            .iter()
            .enumerate()
            .map(|(i, ticker)| format!("{} {ticker}", palette.muted(&format!("{}.", i + 1))))
            .collect();
        output.push_str(&format!("Trending: {}\n\n", trending.join("  ")));

        for (title, blurb) in FEATURES {
            output.push_str(&format!("  {}  {}\n", palette.heading(title), palette.muted(blurb)));
        }

        if let Some(error) = self.error {
            output.push_str(&format!("\n{}\n", palette.bad(&format!("❌ Error: {error}"))));
        }

        output
    }
}
