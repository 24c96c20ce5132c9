//! Report view: header, narrative, charts, history table and sources

use super::chart::{ChartData, ChartKind, GranularitySelector, render_chart};
use super::format::{Palette, format_number, source_host};
use super::markdown::render_markdown_indented;
use crate::model::{AnalysisSection, FinancialPeriod, FinancialReport, Granularity};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

/// Layout options for the report view
#[derive(Debug, Clone, Copy)]
pub struct ReportLayout {
    pub palette: Palette,
    /// Total width for the history table
    pub width: u16,
    /// Columns for a chart's plot area
    pub chart_width: usize,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            width: 110,
            chart_width: 40,
        }
    }
}

/// Render a report with the charts at the selector's active granularity
pub fn render_report(
    report: &FinancialReport,
    selector: &GranularitySelector,
    layout: &ReportLayout,
) -> String {
    let palette = layout.palette;
    let mut output = String::new();

    output.push_str(&header(report, palette));

    output.push_str(&format!("\n{}\n", palette.heading("Executive Summary")));
    output.push_str(&render_markdown_indented(&report.executive_summary, palette, 2));
    output.push('\n');

    output.push_str(&format!("\n{}\n", palette.heading("Key Opportunities")));
    output.push_str(&bullets(&report.opportunities, &palette.good("•")));
    output.push_str(&format!("\n{}\n", palette.heading("Risk Factors")));
    output.push_str(&bullets(&report.risks, &palette.bad("•")));

    output.push_str(&format!(
        "\n{} {}\n",
        palette.heading("Financial Visualization"),
        palette.muted(&format!("(Unit: {})", report.reporting_unit))
    ));
    if selector.offers_choice() {
        output.push_str(&granularity_toggle(selector, palette));
    }
    for kind in ChartKind::ALL {
        let data = ChartData::build(kind, &report.periods, selector.active());
        output.push('\n');
        output.push_str(&render_chart(&data, palette, layout.chart_width));
    }

    output.push_str(&format!("\n{}\n", palette.heading("Deep Dive Analysis")));
    output.push_str(&analysis("Vertical Analysis", &report.vertical_analysis, palette));
    output.push_str(&analysis("Horizontal Analysis", &report.horizontal_analysis, palette));

    output.push_str(&format!(
        "\n{}\n",
        palette.heading(&format!("Historical Data (Unit: {})", report.reporting_unit))
    ));
    output.push_str(&history_table(&report.periods, layout).to_string());
    output.push('\n');

    if !report.sources.is_empty() {
        output.push_str(&format!("\n{}\n", palette.heading("Sources & References")));
        for (i, source) in report.sources.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {}  {}\n",
                i + 1,
                source_host(source),
                palette.muted(source)
            ));
        }
    }

    output
}

fn header(report: &FinancialReport, palette: Palette) -> String {
    let mut title = report.company_name.clone();
    if !report.ticker.is_empty() {
        title.push_str(&format!(" ({})", report.ticker));
    }

    let latest = report.latest_period().map_or_else(
        || "-".to_string(),
        |p| format!("{} {}", format_number(p.revenue), report.reporting_unit),
    );

    let counts: Vec<String> = Granularity::ALL
        .iter()
        .map(|g| format!("{} {}", report.periods_of(*g).count(), g.view_label().to_lowercase()))
        .collect();

    format!(
        "{}\nCurrency: {} • Units: {}\nLatest Revenue: {}\n{}\n",
        palette.title(&title),
        report.currency,
        report.reporting_unit,
        palette.heading(&latest),
        palette.muted(&format!("Periods: {}", counts.join(", "))),
    )
}

fn bullets(items: &[String], marker: &str) -> String {
    if items.is_empty() {
        return "  -\n".to_string();
    }
    items
        .iter()
        .map(|item| format!("  {marker} {item}\n"))
        .collect()
}

fn granularity_toggle(selector: &GranularitySelector, palette: Palette) -> String {
    let active = selector.active();
    let options: Vec<String> = selector
        .available()
        .iter()
        .map(|g| {
            if Some(*g) == active {
                palette.heading(&format!("[{}]", g.view_label()))
            } else {
                palette.muted(g.view_label())
            }
        })
        .collect();
    format!("View: {}  {}\n", options.join(" "), palette.muted("(/view year|month)"))
}

fn analysis(title: &str, section: &AnalysisSection, palette: Palette) -> String {
    let mut output = format!("\n{}\n", palette.heading(title));
    if !section.summary.is_empty() {
        output.push_str(&render_markdown_indented(&section.summary, palette, 2));
        output.push('\n');
    }
    if !section.key_points.is_empty() {
        output.push_str(&format!("  {}\n", palette.muted("Key Takeaways")));
        for point in &section.key_points {
            output.push_str(&format!("  • {point}\n"));
        }
    }
    output
}

/// Every period in array order, quarters included
pub fn history_table(periods: &[FinancialPeriod], layout: &ReportLayout) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(layout.width)
        .set_header(vec![
            "Period",
            "Type",
            "Revenue",
            "Gross Profit",
            "Operating Income",
            "Net Income",
            "Total Assets",
            "Total Equity",
        ]);

    if layout.palette.is_color() {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    for period in periods {
        let emphasise = period.granularity == Granularity::Year;
        let text = |value: String, align: CellAlignment| {
            let cell = Cell::new(value).set_alignment(align);
            if emphasise {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        };
        let amount = |value: f64| text(format_number(value), CellAlignment::Right);
        let optional = |value: Option<f64>| {
            text(value.map_or_else(|| "-".to_string(), format_number), CellAlignment::Right)
        };

        table.add_row(vec![
            text(period.period_label.clone(), CellAlignment::Left),
            text(period.granularity.to_string(), CellAlignment::Left),
            amount(period.revenue),
            amount(period.gross_profit),
            amount(period.operating_income),
            amount(period.net_income),
            optional(period.total_assets),
            optional(period.total_equity),
        ]);
    }

    table
}
