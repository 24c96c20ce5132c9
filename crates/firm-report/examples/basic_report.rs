//! Basic financial report example
//!
//! Requests one grounded report and prints the headline figures plus the
//! yearly margins.
//!
//! To run this example:
//! ```bash
//! export GEMINI_API_KEY=your_key_here
//!
//! cargo run -p firm-report --example basic_report VNM 2020 2024
//! ```

use firm_llm::providers::GeminiConfig;
use firm_report::view::{format_number, margins};
use firm_report::{Granularity, ReportClient, ReportConfig};
use firm_utils::LogConfig;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    firm_utils::init_tracing(&LogConfig::default());

    let args: Vec<String> = env::args().skip(1).collect();
    let ticker = args.first().map_or("AAPL", String::as_str);
    let (default_start, default_end) = firm_report::query::default_range(firm_report::query::current_year());
    let start: i32 = args.get(1).map_or(Ok(default_start), |s| s.parse())?;
    let end: i32 = args.get(2).map_or(Ok(default_end), |s| s.parse())?;

    println!("=== Firm Analysis ===\n");
    println!("Analyzing: {ticker} ({start}-{end})\n");

    let config = ReportConfig::builder().env_model().build()?;
    let client = ReportClient::gemini(GeminiConfig::from_env()?, config)?;
    println!("Configuration:");
    println!("  - Provider: {}", client.provider_name());
    println!("  - Model: {}", client.config().model);
    println!("  - Merge grounding sources: {}\n", client.config().merge_grounding_sources);

    let report = client.analyze_ticker(ticker, start, end).await?;

    println!("{} ({})", report.company_name, report.reporting_unit);
    for period in report.periods_of(Granularity::Year) {
        let m = margins(period);
        println!(
            "  {:<8} revenue {:>14}  gross {:>6.1}%  net {:>6.1}%",
            period.period_label,
            format_number(period.revenue),
            m.gross,
            m.net
        );
    }

    println!("\nSources:");
    for source in &report.sources {
        println!("  - {source}");
    }

    Ok(())
}
