//! Validated search input

use crate::error::{ReportError, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Earliest year a search may cover
pub const MIN_YEAR: i32 = 1990;

/// Number of years before the current one covered by the default range
pub const DEFAULT_SPAN_YEARS: i32 = 4;

/// Tickers offered as one-keystroke searches
pub const TRENDING_TICKERS: [&str; 7] = ["AAPL", "GOOGL", "MSFT", "TSLA", "NVDA", "VNM", "AMZN"];

/// Current calendar year in local time
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Default `(start, end)` range: the last five calendar years
pub fn default_range(current_year: i32) -> (i32, i32) {
    (current_year - DEFAULT_SPAN_YEARS, current_year)
}

/// Check an inclusive year range against `[MIN_YEAR, current_year]`
pub fn validate_range(start_year: i32, end_year: i32, current_year: i32) -> Result<()> {
    for year in [start_year, end_year] {
        if !(MIN_YEAR..=current_year).contains(&year) {
            return Err(ReportError::InvalidQuery(format!(
                "Year {year} is outside {MIN_YEAR}-{current_year}"
            )));
        }
    }

    if start_year > end_year {
        return Err(ReportError::InvalidQuery(format!(
            "Start year {start_year} is after end year {end_year}"
        )));
    }

    Ok(())
}

/// A ticker plus an inclusive year range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    ticker: String,
    start_year: i32,
    end_year: i32,
}

impl SearchQuery {
    /// Validate against the current calendar year
    pub fn new(ticker: impl AsRef<str>, start_year: i32, end_year: i32) -> Result<Self> {
        Self::with_current_year(ticker, start_year, end_year, current_year())
    }

    /// Validate against an explicit current year
    pub fn with_current_year(
        ticker: impl AsRef<str>,
        start_year: i32,
        end_year: i32,
        current_year: i32,
    ) -> Result<Self> {
        let ticker = ticker.as_ref().trim();
        if ticker.is_empty() {
            return Err(ReportError::InvalidQuery("Ticker must not be empty".to_string()));
        }

        validate_range(start_year, end_year, current_year)?;

        Ok(Self {
            ticker: ticker.to_string(),
            start_year,
            end_year,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Number of calendar years covered, inclusive
    pub fn year_count(&self) -> i32 {
        self.end_year - self.start_year + 1
    }
}
