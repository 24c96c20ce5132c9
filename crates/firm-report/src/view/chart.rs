//! Chart data and text rendering
//!
//! Charts only plot yearly and monthly periods; quarters appear in the
//! history table alone. Derived percentages are computed here, at render
//! time, and never written back into the report.

use super::format::{Palette, format_number, format_percent};
use crate::model::{FinancialPeriod, Granularity};

/// Shown in place of a chart with no periods
pub const NO_DATA: &str = "No data available for this view.";

/// Which of the three report charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Revenue and net income bars with a gross profit line
    RevenueProfit,
    /// Gross, operating and net margin percentages
    Margins,
    /// Return on assets and equity percentages
    Ratios,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::RevenueProfit, ChartKind::Margins, ChartKind::Ratios];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::RevenueProfit => "Revenue & Net Income Trend",
            ChartKind::Margins => "Margin Analysis (%)",
            ChartKind::Ratios => "Return on Assets & Equity (%)",
        }
    }

    fn is_percent(&self) -> bool {
        !matches!(self, ChartKind::RevenueProfit)
    }
}

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Bar,
    Line,
}

/// One named series of values, aligned with the chart labels
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub style: SeriesStyle,
    pub values: Vec<f64>,
}

/// Margin percentages of one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub gross: f64,
    pub operating: f64,
    pub net: f64,
}

/// Return ratios of one period, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnRatios {
    pub roa: f64,
    pub roe: f64,
}

/// `numerator / denominator * 100`, or 0 when the denominator is absent or zero
fn percent_of(numerator: f64, denominator: Option<f64>) -> f64 {
    match denominator {
        Some(d) if d != 0.0 => numerator / d * 100.0,
        _ => 0.0,
    }
}

/// Margins relative to revenue; all zero when revenue is zero
pub fn margins(period: &FinancialPeriod) -> Margins {
    let revenue = Some(period.revenue);
    Margins {
        gross: percent_of(period.gross_profit, revenue),
        operating: percent_of(period.operating_income, revenue),
        net: percent_of(period.net_income, revenue),
    }
}

/// ROA and ROE; a missing or zero denominator yields 0
pub fn return_ratios(period: &FinancialPeriod) -> ReturnRatios {
    ReturnRatios {
        roa: percent_of(period.net_income, period.total_assets),
        roe: percent_of(period.net_income, period.total_equity),
    }
}

/// Chartable granularities present in `periods`, yearly first
pub fn available_granularities(periods: &[FinancialPeriod]) -> Vec<Granularity> {
    let mut found: Vec<Granularity> = Vec::new();
    for period in periods {
        if period.granularity.chart_rank().is_some() && !found.contains(&period.granularity) {
            found.push(period.granularity);
        }
    }
    found.sort_by_key(Granularity::chart_rank);
    found
}

/// Periods of `granularity`, sorted by label
pub fn chart_periods(periods: &[FinancialPeriod], granularity: Granularity) -> Vec<&FinancialPeriod> {
    let mut selected: Vec<_> = periods
        .iter()
        .filter(|p| p.granularity == granularity)
        .collect();
    selected.sort_by(|a, b| a.period_label.cmp(&b.period_label));
    selected
}

/// Chart granularity toggle, kept across re-renders of one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GranularitySelector {
    selected: Granularity,
    available: Vec<Granularity>,
}

impl Default for GranularitySelector {
    fn default() -> Self {
        Self {
            selected: Granularity::Year,
            available: Vec::new(),
        }
    }
}

impl GranularitySelector {
    pub fn new(periods: &[FinancialPeriod]) -> Self {
        let mut selector = Self::default();
        selector.refresh(periods);
        if let Some(first) = selector.available.first() {
            selector.selected = *first;
        }
        selector
    }

    /// Re-evaluate availability for a new set of periods
    ///
    /// The previous selection is kept and resurfaces if a later report
    /// offers it again.
    pub fn refresh(&mut self, periods: &[FinancialPeriod]) {
        self.available = available_granularities(periods);
    }

    /// Granularity to chart: the selection if available, else the first available
    pub fn active(&self) -> Option<Granularity> {
        if self.available.contains(&self.selected) {
            Some(self.selected)
        } else {
            self.available.first().copied()
        }
    }

    /// Remember `granularity` for reports that offer it
    pub fn prefer(&mut self, granularity: Granularity) {
        self.selected = granularity;
    }

    /// Select `granularity` if it is available
    pub fn select(&mut self, granularity: Granularity) -> bool {
        if self.available.contains(&granularity) {
            self.selected = granularity;
            true
        } else {
            false
        }
    }

    /// Whether the toggle should be shown at all
    pub fn offers_choice(&self) -> bool {
        self.available.len() > 1
    }

    pub fn available(&self) -> &[Granularity] {
        &self.available
    }
}

/// Labels and series for one chart at one granularity
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub granularity: Option<Granularity>,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    pub fn build(
        kind: ChartKind,
        periods: &[FinancialPeriod],
        granularity: Option<Granularity>,
    ) -> Self {
        let selected = granularity
            .map(|g| chart_periods(periods, g))
            .unwrap_or_default();

        let labels = selected.iter().map(|p| p.period_label.clone()).collect();
        let series = match kind {
            ChartKind::RevenueProfit => vec![
                series("Revenue", SeriesStyle::Bar, &selected, |p| p.revenue),
                series("Net Income", SeriesStyle::Bar, &selected, |p| p.net_income),
                series("Gross Profit", SeriesStyle::Line, &selected, |p| p.gross_profit),
            ],
            ChartKind::Margins => vec![
                series("Gross Margin", SeriesStyle::Line, &selected, |p| margins(p).gross),
                series("Operating Margin", SeriesStyle::Line, &selected, |p| {
                    margins(p).operating
                }),
                series("Net Margin", SeriesStyle::Line, &selected, |p| margins(p).net),
            ],
            ChartKind::Ratios => vec![
                series("ROA", SeriesStyle::Line, &selected, |p| return_ratios(p).roa),
                series("ROE", SeriesStyle::Line, &selected, |p| return_ratios(p).roe),
            ],
        };

        Self {
            kind,
            granularity,
            labels,
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn max_magnitude(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

fn series(
    name: &'static str,
    style: SeriesStyle,
    periods: &[&FinancialPeriod],
    value: impl Fn(&FinancialPeriod) -> f64,
) -> Series {
    Series {
        name,
        style,
        values: periods.iter().map(|p| value(*p)).collect(),
    }
}

/// Render a chart panel as text, `width` columns for the plot area
pub fn render_chart(data: &ChartData, palette: Palette, width: usize) -> String {
    let mut title = data.kind.title().to_string();
    if let Some(granularity) = data.granularity {
        title.push_str(&format!(" ({})", granularity.view_label()));
    }

    let mut output = format!("{}\n", palette.heading(&title));
    if data.is_empty() {
        output.push_str(&format!("  {}\n", palette.muted(NO_DATA)));
        return output;
    }

    let label_width = data.labels.iter().map(String::len).max().unwrap_or(0);
    let name_width = data.series.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let scale = data.max_magnitude();

    for (row, label) in data.labels.iter().enumerate() {
        for (i, series) in data.series.iter().enumerate() {
            let value = series.values.get(row).copied().unwrap_or_default();
            let shown_label = if i == 0 { label.as_str() } else { "" };
            let plot = plot_cell(series.style, value, scale, width);
            let plot = if value < 0.0 { palette.bad(&plot) } else { palette.accent(&plot) };
            let text = if data.kind.is_percent() {
                format_percent(value)
            } else {
                format_number(value)
            };

            output.push_str(&format!(
                "  {shown_label:<label_width$}  {:<name_width$}  {plot} {text}\n",
                series.name
            ));
        }
    }

    output
}

fn plot_cell(style: SeriesStyle, value: f64, scale: f64, width: usize) -> String {
    let width = width.max(1);
    let filled = if scale > 0.0 {
        ((value.abs() / scale) * width as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(width);

    match style {
        SeriesStyle::Bar => format!("{}{}", "█".repeat(filled), " ".repeat(width - filled)),
        SeriesStyle::Line => {
            let position = filled.saturating_sub(1);
            format!(
                "{}●{}",
                "·".repeat(position),
                " ".repeat(width - position - 1)
            )
        }
    }
}
