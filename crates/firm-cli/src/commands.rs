//! Input parsing for the interactive search loop

use firm_report::Granularity;
use firm_report::query::TRENDING_TICKERS;
use thiserror::Error;

/// Rejected input line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Empty input")]
    Empty,

    #[error("Unknown command: /{0}")]
    Unknown(String),

    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Charts show yearly or monthly data; quarters appear in the history table")]
    QuarterView,
}

/// Parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search a ticker, optionally over a new year range
    Search {
        ticker: String,
        start_year: Option<i32>,
        end_year: Option<i32>,
    },
    /// Search the n-th trending ticker (1-based)
    Trending(usize),
    /// Change the year range for later searches
    Range { start_year: i32, end_year: i32 },
    /// Switch chart granularity
    View(Granularity),
    /// Back to the search view
    Back,
    Help,
    Exit,
}

fn parse_year(text: &str) -> Result<i32, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidYear(text.to_string()))
}

impl Command {
    /// Parse a line of user input
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        if let Some(rest) = input.strip_prefix('/') {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            let Some((cmd, args)) = parts.split_first() else {
                return Err(CommandError::Empty);
            };

            return match cmd.to_lowercase().as_str() {
                "range" | "r" => match args {
                    [start, end] => Ok(Command::Range {
                        start_year: parse_year(start)?,
                        end_year: parse_year(end)?,
                    }),
                    _ => Err(CommandError::Usage("/range <START> <END>")),
                },
                "view" | "v" => match args {
                    [granularity] => match granularity.parse::<Granularity>() {
                        Ok(Granularity::Quarter) => Err(CommandError::QuarterView),
                        Ok(granularity) => Ok(Command::View(granularity)),
                        Err(_) => Err(CommandError::Usage("/view year|month")),
                    },
                    _ => Err(CommandError::Usage("/view year|month")),
                },
                "back" | "b" | "new" => Ok(Command::Back),
                "help" | "h" | "?" => Ok(Command::Help),
                "exit" | "quit" | "q" => Ok(Command::Exit),
                other => Err(CommandError::Unknown(other.to_string())),
            };
        }

        // Numbered trending picks; other numbers are tickers (e.g. 2330)
        if let Ok(position) = input.parse::<usize>() {
            if (1..=TRENDING_TICKERS.len()).contains(&position) {
                return Ok(Command::Trending(position));
            }
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            [ticker] => Ok(Command::Search {
                ticker: ticker.to_uppercase(),
                start_year: None,
                end_year: None,
            }),
            [ticker, start] => Ok(Command::Search {
                ticker: ticker.to_uppercase(),
                start_year: Some(parse_year(start)?),
                end_year: None,
            }),
            [ticker, start, end] => Ok(Command::Search {
                ticker: ticker.to_uppercase(),
                start_year: Some(parse_year(start)?),
                end_year: Some(parse_year(end)?),
            }),
            _ => Err(CommandError::Usage("<TICKER> [START] [END]")),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Firm Analysis Assistant Commands
================================

Search:
  <TICKER> [START] [END]   Analyze a listed firm (e.g. AAPL, VNM 2020 2024)
  1-7                      Analyze a trending ticker

Settings:
  /range <START> <END>     Year range for later searches
  /view year|month         Chart granularity of the current report

Other Commands:
  /back                    Back to the search view
  /help                    Show help
  /exit                    Exit

Command Aliases:
  /r = /range    /v = /view    /b = /back    /q = /exit
"
    }
}
