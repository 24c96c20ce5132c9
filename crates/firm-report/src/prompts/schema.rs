//! Strict response schema for the report JSON

use firm_llm::schema::{array, described, enumeration, number, object, string};
use serde_json::{Value, json};

fn analysis_section() -> Value {
    object(
        json!({
            "summary": string(),
            "keyPoints": array(string()),
        }),
        &[],
    )
}

fn period() -> Value {
    object(
        json!({
            "periodLabel": string(),
            "type": enumeration(&["year", "quarter", "month"]),
            "year": described(string(), "The year this period belongs to (e.g. '2023')"),
            "revenue": number(),
            "costOfRevenue": number(),
            "grossProfit": number(),
            "operatingExpenses": number(),
            "operatingIncome": number(),
            "netIncome": number(),
            "totalAssets": number(),
            "totalEquity": number(),
        }),
        &["periodLabel", "type", "year", "revenue", "grossProfit", "netIncome"],
    )
}

/// Schema the model's JSON reply must satisfy
pub fn report_schema() -> Value {
    object(
        json!({
            "companyName": string(),
            "ticker": string(),
            "currency": string(),
            "reportingUnit": described(
                string(),
                "The unit of the numbers, e.g., 'Billion VND' or 'Million USD'",
            ),
            "periods": array(period()),
            "verticalAnalysis": analysis_section(),
            "horizontalAnalysis": analysis_section(),
            "executiveSummary": string(),
            "risks": array(string()),
            "opportunities": array(string()),
            "sources": array(string()),
        }),
        &[
            "companyName",
            "periods",
            "reportingUnit",
            "verticalAnalysis",
            "horizontalAnalysis",
            "executiveSummary",
        ],
    )
}
