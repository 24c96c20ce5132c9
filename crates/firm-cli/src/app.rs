//! Interactive search loop and one-shot runs

use crate::commands::Command;
use clap::ValueEnum;
use console::style;
use firm_report::view::LoadingSpinner;
use firm_report::{Dashboard, Phase, ReportClient, ReportError, SearchController, SearchQuery};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::warn;

/// How a finished report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Terminal dashboard
    Text,
    /// Report JSON on stdout
    Json,
}

/// Controller plus the dashboard rendering its state
pub struct App {
    controller: SearchController,
    dashboard: Dashboard,
    format: OutputFormat,
}

impl App {
    pub fn new(client: Arc<ReportClient>, dashboard: Dashboard, format: OutputFormat) -> Self {
        Self {
            controller: SearchController::new(client),
            dashboard,
            format,
        }
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    /// Banner text of the last failed search
    pub fn error(&self) -> Option<&str> {
        self.controller.error()
    }

    /// Run one search, showing the spinner while it is in flight
    pub async fn search(&mut self, query: SearchQuery) -> Result<Phase, ReportError> {
        let dashboard = &mut self.dashboard;
        let format = self.format;
        let mut spinner: Option<LoadingSpinner> = None;

        self.controller
            .submit_with(query, |state| {
                if state.phase() == Phase::Loading {
                    spinner = Some(LoadingSpinner::start(state.query()));
                    return;
                }
                if let Some(spinner) = spinner.take() {
                    spinner.finish();
                }

                match (format, state.report()) {
                    (OutputFormat::Json, Some(report)) => match serde_json::to_string_pretty(report) {
                        Ok(json) => println!("{json}"),
                        Err(e) => warn!(error = %e, "Failed to serialize report"),
                    },
                    (OutputFormat::Json, None) => {}
                    (OutputFormat::Text, _) => println!("{}", dashboard.render(state)),
                }
            })
            .await
    }

    /// Read commands from stdin until `/exit` or end of input
    pub async fn run_interactive(&mut self) -> anyhow::Result<()> {
        println!("{}", self.dashboard.render(self.controller.state()));
        println!("{}\n", style("Type /help for commands.").dim());

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("{} ", style("firm>").cyan().bold());
            stdout.flush()?;

            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {e}");
                    continue;
                }
            }

            if input.trim().is_empty() {
                continue;
            }

            match Command::parse(&input) {
                Ok(Command::Exit) => {
                    println!("Goodbye!");
                    break;
                }
                Ok(command) => self.execute(command).await,
                Err(e) => print_error(&e.to_string()),
            }
        }

        Ok(())
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Search {
                ticker,
                start_year,
                end_year,
            } => {
                let (start, end) = self.dashboard.range();
                if start_year.is_some() || end_year.is_some() {
                    let range = (start_year.unwrap_or(start), end_year.unwrap_or(end));
                    if let Err(e) = self.dashboard.set_range(range.0, range.1) {
                        print_error(&e.user_message());
                        return;
                    }
                }
                self.search_ticker(&ticker).await;
            }
            Command::Trending(position) => {
                if let Some(ticker) = self.dashboard.trending(position) {
                    self.search_ticker(ticker).await;
                }
            }
            Command::Range {
                start_year,
                end_year,
            } => match self.dashboard.set_range(start_year, end_year) {
                Ok(()) => println!("Period set to {start_year} - {end_year}\n"),
                Err(e) => print_error(&e.user_message()),
            },
            Command::View(granularity) => {
                if self.controller.phase() != Phase::Success {
                    print_error("No report to chart yet");
                } else if self.dashboard.select_granularity(granularity) {
                    println!("{}", self.dashboard.render(self.controller.state()));
                } else {
                    print_error(&format!(
                        "This report has no {} data",
                        granularity.view_label().to_lowercase()
                    ));
                }
            }
            Command::Back => {
                self.controller.reset();
                println!("{}", self.dashboard.render(self.controller.state()));
            }
            Command::Help => println!("{}", Command::help_text()),
            Command::Exit => {}
        }
    }

    async fn search_ticker(&mut self, ticker: &str) {
        let query = match self.dashboard.query_for(ticker) {
            Ok(query) => query,
            Err(e) => {
                print_error(&e.user_message());
                return;
            }
        };

        if let Err(e) = self.search(query).await {
            print_error(&e.user_message());
        }
    }
}

fn print_error(message: &str) {
    eprintln!("{}\n", style(format!("❌ Error: {message}")).red());
}
