//! Number, URL and colour helpers shared by the views

use console::Style;
use url::Url;

/// Format with thousands separators and at most two decimals
///
/// ```
/// use firm_report::view::format_number;
///
/// assert_eq!(format_number(1_234_567.891), "1,234,567.89");
/// assert_eq!(format_number(-1500.5), "-1,500.5");
/// assert_eq!(format_number(42.0), "42");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && (grouped != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Format a percentage value, e.g. `40%` or `7.5%`
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

/// Hostname of a source URL without a leading `www.`, or `Source`
pub fn source_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.strip_prefix("www.").unwrap_or(h).to_string()))
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "Source".to_string())
}

/// Terminal styling that can be switched off for plain output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Palette following the terminal's colour support on stdout
    pub fn detect() -> Self {
        Self::new(console::colors_enabled())
    }

    /// Palette that never emits escape codes
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_color(&self) -> bool {
        self.color
    }

    fn paint(&self, style: Style, text: &str) -> String {
        style.force_styling(self.color).apply_to(text).to_string()
    }

    pub fn title(&self, text: &str) -> String {
        self.paint(Style::new().bold().cyan(), text)
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    pub fn emphasis(&self, text: &str) -> String {
        self.paint(Style::new().italic(), text)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(Style::new().dim(), text)
    }

    pub fn good(&self, text: &str) -> String {
        self.paint(Style::new().green(), text)
    }

    pub fn bad(&self, text: &str) -> String {
        self.paint(Style::new().red(), text)
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(Style::new().blue(), text)
    }

    pub fn code(&self, text: &str) -> String {
        self.paint(Style::new().yellow(), text)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::detect()
    }
}
