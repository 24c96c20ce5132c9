//! Financial report data model
//!
//! Wire names follow the model's JSON reply (camelCase, `type` for the
//! period granularity). Monetary values are expressed in the report's
//! reporting unit and are never rescaled.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time granularity of a reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Quarter,
    Month,
}

impl Granularity {
    /// All granularities, in the order the model is asked to report them
    pub const ALL: [Granularity; 3] = [Granularity::Year, Granularity::Quarter, Granularity::Month];

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Year => "year",
            Granularity::Quarter => "quarter",
            Granularity::Month => "month",
        }
    }

    /// Label used by the chart view toggle
    pub fn view_label(&self) -> &'static str {
        match self {
            Granularity::Year => "Yearly",
            Granularity::Quarter => "Quarterly",
            Granularity::Month => "Monthly",
        }
    }

    /// Position among chartable granularities; quarters are table-only
    pub fn chart_rank(&self) -> Option<u8> {
        match self {
            Granularity::Year => Some(0),
            Granularity::Month => Some(1),
            Granularity::Quarter => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "year" | "yearly" | "annual" | "y" => Ok(Granularity::Year),
            "quarter" | "quarterly" | "q" => Ok(Granularity::Quarter),
            "month" | "monthly" | "m" => Ok(Granularity::Month),
            other => Err(format!("Unknown granularity: {other}")),
        }
    }
}

/// One reporting period of income-statement and balance-sheet figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPeriod {
    /// Display label, e.g. "2023", "Q1 2024", "Jan 2024"
    pub period_label: String,

    #[serde(rename = "type")]
    pub granularity: Granularity,

    /// Year this period belongs to, for grouping
    pub year: String,

    pub revenue: f64,

    #[serde(default, deserialize_with = "null_as_zero")]
    pub cost_of_revenue: f64,

    pub gross_profit: f64,

    #[serde(default, deserialize_with = "null_as_zero")]
    pub operating_expenses: f64,

    #[serde(default, deserialize_with = "null_as_zero")]
    pub operating_income: f64,

    pub net_income: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_assets: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_equity: Option<f64>,
}

// Models sometimes send `null` for figures they could not find
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Narrative analysis with its key takeaways
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSection {
    /// Markdown text
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Complete report returned for one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub company_name: String,

    #[serde(default)]
    pub ticker: String,

    #[serde(default)]
    pub currency: String,

    /// Unit every monetary value is expressed in, e.g. "Billion VND"
    pub reporting_unit: String,

    /// Periods in the order the model returned them
    pub periods: Vec<FinancialPeriod>,

    pub vertical_analysis: AnalysisSection,

    pub horizontal_analysis: AnalysisSection,

    /// Markdown text
    pub executive_summary: String,

    #[serde(default)]
    pub risks: Vec<String>,

    #[serde(default)]
    pub opportunities: Vec<String>,

    #[serde(default)]
    pub sources: Vec<String>,
}

impl FinancialReport {
    /// Last period in array order, used for the header's latest revenue
    pub fn latest_period(&self) -> Option<&FinancialPeriod> {
        self.periods.last()
    }

    /// Periods of one granularity, in array order
    pub fn periods_of(&self, granularity: Granularity) -> impl Iterator<Item = &FinancialPeriod> {
        self.periods
            .iter()
            .filter(move |p| p.granularity == granularity)
    }

    /// Append sources not already listed; returns how many were added
    pub fn merge_sources<I, S>(&mut self, extra: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.sources.len();
        for source in extra {
            let source = source.into();
            if !source.is_empty() && !self.sources.contains(&source) {
                self.sources.push(source);
            }
        }
        self.sources.len() - before
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_period_wire_names() {
        let json = r#"{
            "periodLabel": "Q1 2024",
            "type": "quarter",
            "year": "2024",
            "revenue": 1000,
            "grossProfit": 400,
            "netIncome": 150,
            "totalAssets": 5000
        }"#;

        let period: FinancialPeriod = serde_json::from_str(json).unwrap();
        assert_eq!(period.period_label, "Q1 2024");
        assert_eq!(period.granularity, Granularity::Quarter);
        assert_eq!(period.year, "2024");
        assert!((period.revenue - 1000.0).abs() < f64::EPSILON);
        assert!(period.cost_of_revenue.abs() < f64::EPSILON);
        assert!(period.operating_income.abs() < f64::EPSILON);
        assert_eq!(period.total_assets, Some(5000.0));
        assert_eq!(period.total_equity, None);
    }

    #[test]
    fn test_period_null_figures_default_to_zero() {
        let json = r#"{
            "periodLabel": "2024",
            "type": "year",
            "year": "2024",
            "revenue": 1000,
            "costOfRevenue": null,
            "grossProfit": 400,
            "operatingExpenses": null,
            "operatingIncome": null,
            "netIncome": 150,
            "totalAssets": null
        }"#;

        let period: FinancialPeriod = serde_json::from_str(json).unwrap();
        assert!(period.cost_of_revenue.abs() < f64::EPSILON);
        assert!(period.operating_expenses.abs() < f64::EPSILON);
        assert!(period.operating_income.abs() < f64::EPSILON);
        assert_eq!(period.total_assets, None);
    }

    #[test]
    fn test_period_missing_required_field() {
        let json = r#"{"periodLabel": "2024", "type": "year", "year": "2024", "revenue": 1}"#;
        assert!(serde_json::from_str::<FinancialPeriod>(json).is_err());
    }

    #[test]
    fn test_unknown_granularity_rejected() {
        let json = r#"{"periodLabel": "H1", "type": "half", "year": "2024", "revenue": 1, "grossProfit": 1, "netIncome": 1}"#;
        assert!(serde_json::from_str::<FinancialPeriod>(json).is_err());
    }

    #[test]
    fn test_report_optional_lists_default() {
        let json = r#"{
            "companyName": "Vinamilk",
            "reportingUnit": "Billion VND",
            "periods": [],
            "verticalAnalysis": {"summary": "x"},
            "horizontalAnalysis": {},
            "executiveSummary": "y"
        }"#;

        let report: FinancialReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.ticker, "");
        assert_eq!(report.currency, "");
        assert!(report.risks.is_empty());
        assert!(report.sources.is_empty());
        assert!(report.vertical_analysis.key_points.is_empty());
        assert!(report.latest_period().is_none());
    }

    #[test]
    fn test_report_keeps_period_order() {
        let report: FinancialReport = serde_json::from_str(&aapl_json()).unwrap();
        let labels: Vec<_> = report.periods.iter().map(|p| p.period_label.as_str()).collect();
        assert_eq!(labels, ["2020", "2021", "2022", "2023", "2024", "Q3 2024", "Q4 2024"]);
        assert_eq!(report.latest_period().unwrap().period_label, "Q4 2024");
        assert_eq!(report.periods_of(Granularity::Year).count(), 5);
        assert_eq!(report.periods_of(Granularity::Month).count(), 0);
    }

    #[test]
    fn test_merge_sources_dedupes_and_keeps_order() {
        let mut report = report(vec![]);
        let added = report.merge_sources([
            "https://www.sec.gov/aapl-10k",
            "https://investor.apple.com",
            "",
            "https://investor.apple.com",
        ]);
        assert_eq!(added, 1);
        assert_eq!(
            report.sources,
            ["https://www.sec.gov/aapl-10k", "https://investor.apple.com"]
        );
    }

    #[test]
    fn test_granularity_parse_and_rank() {
        assert_eq!("Monthly".parse::<Granularity>().unwrap(), Granularity::Month);
        assert_eq!("year".parse::<Granularity>().unwrap(), Granularity::Year);
        assert!("weekly".parse::<Granularity>().is_err());

        assert_eq!(Granularity::Year.chart_rank(), Some(0));
        assert_eq!(Granularity::Month.chart_rank(), Some(1));
        assert_eq!(Granularity::Quarter.chart_rank(), None);
        assert_eq!(Granularity::Quarter.to_string(), "quarter");
    }
}
