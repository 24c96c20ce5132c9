//! User message sent with every analysis request

use super::PromptTemplate;
use crate::error::Result;
use serde_json::json;

const ANALYSIS_REQUEST: PromptTemplate = PromptTemplate::new(
    "report.user.analyze",
    "Analyze the financial performance of {{ ticker }} for the period {{ start_year }} to {{ end_year }}, with annual, quarterly, and monthly breakdown if possible.",
);

/// Render the user message for one ticker and year range
pub fn analysis_request(ticker: &str, start_year: i32, end_year: i32) -> Result<String> {
    ANALYSIS_REQUEST.render(&json!({
        "ticker": ticker,
        "start_year": start_year,
        "end_year": end_year,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_request() {
        let text = analysis_request("AAPL", 2020, 2024).unwrap();
        assert_eq!(
            text,
            "Analyze the financial performance of AAPL for the period 2020 to 2024, with annual, quarterly, and monthly breakdown if possible."
        );
    }
}
