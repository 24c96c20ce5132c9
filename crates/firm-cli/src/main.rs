//! Firm Analysis Assistant
//!
//! Terminal dashboard for a listed firm's financial statements. A ticker
//! and year range go to Gemini with Google Search grounding; the JSON reply
//! is rendered as charts, tables and narrative analysis.
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY="..."
//!
//! # Interactive search
//! cargo run --bin firm-analyst
//!
//! # One-shot report
//! cargo run --bin firm-analyst -- VNM --start 2020 --end 2024
//! ```

mod app;
mod commands;

use anyhow::Context;
use app::{App, OutputFormat};
use clap::{Parser, ValueEnum};
use firm_llm::providers::GeminiConfig;
use firm_report::view::{Palette, ReportLayout};
use firm_report::{Dashboard, Granularity, Phase, ReportClient, ReportConfig};
use firm_utils::{LogConfig, LogFormat};
use std::sync::Arc;
use tracing::info;

/// Chart granularity accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChartView {
    Year,
    Month,
}

impl From<ChartView> for Granularity {
    fn from(view: ChartView) -> Self {
        match view {
            ChartView::Year => Granularity::Year,
            ChartView::Month => Granularity::Month,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "firm-analyst", version)]
#[command(about = "Financial statement analysis for listed firms, grounded in live web search", long_about = None)]
struct Args {
    /// Ticker to analyze; starts the interactive search when omitted
    ticker: Option<String>,

    /// First year of the range (default: four years ago)
    #[arg(long)]
    start: Option<i32>,

    /// Last year of the range (default: current year)
    #[arg(long)]
    end: Option<i32>,

    /// Chart granularity when the report has both
    #[arg(long, value_enum, default_value_t = ChartView::Year)]
    view: ChartView,

    /// Output format for one-shot runs
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Model identifier (default: GEMINI_MODEL or gemini-3-pro-preview)
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Log output format: pretty or json
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Debug logging for the report and provider crates
    #[arg(short, long)]
    verbose: bool,

    /// Disable colours
    #[arg(long)]
    no_color: bool,

    /// Width of the history table
    #[arg(long, default_value_t = 110)]
    width: u16,
}

fn report_config(args: &Args) -> anyhow::Result<ReportConfig> {
    let mut builder = ReportConfig::builder().env_model();
    if let Some(model) = &args.model {
        builder = builder.model(model);
    }
    if let Some(temperature) = args.temperature {
        builder = builder.temperature(temperature);
    }
    Ok(builder.build()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    firm_utils::init_tracing(
        &LogConfig::default()
            .with_format(args.log_format)
            .verbose(args.verbose),
    );

    if args.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let gemini = GeminiConfig::from_env().context("Set GEMINI_API_KEY to your Gemini API key")?;
    let config = report_config(&args)?;
    info!(model = %config.model, "Starting firm-analyst");

    let client = Arc::new(ReportClient::gemini(gemini, config)?);

    let palette = if args.no_color {
        Palette::plain()
    } else {
        Palette::detect()
    };
    let mut dashboard = Dashboard::new(ReportLayout {
        palette,
        width: args.width,
        ..ReportLayout::default()
    });
    dashboard.prefer_granularity(args.view.into());

    let (default_start, default_end) = dashboard.range();
    dashboard.set_range(
        args.start.unwrap_or(default_start),
        args.end.unwrap_or(default_end),
    )?;

    let mut app = App::new(client, dashboard, args.format);

    let Some(ticker) = args.ticker.as_deref() else {
        return app.run_interactive().await;
    };

    let query = app.dashboard_mut().query_for(&ticker.to_uppercase())?;
    let phase = app.search(query).await?;
    if phase == Phase::Error {
        anyhow::bail!(
            app.error()
                .unwrap_or("Analysis failed")
                .to_string()
        );
    }

    Ok(())
}
