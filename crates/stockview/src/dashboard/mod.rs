//! Interactive dashboard session
//!
//! One [`Dashboard`] holds the state of a single user's session: the last
//! search, its matches, the selected company and the date range. Every
//! command runs one linear pass (search, fetch, compute, render) and nothing
//! is carried over between passes except that state.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockview::{CompanyDirectory, DashboardConfig, YahooProvider};
//! use stockview::dashboard::Dashboard;
//! use std::sync::Arc;
//!
//! let config = DashboardConfig::builder().with_env().build()?;
//! let directory = CompanyDirectory::load(&config.companies_path)?;
//! let provider = Arc::new(YahooProvider::new(&config)?);
//! let mut dashboard = Dashboard::new(directory, provider, config);
//!
//! if let Some(output) = dashboard.process_input("apple").await? {
//!     println!("{output}");
//! }
//! ```

pub mod commands;
pub mod view;

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::directory::{CompanyDirectory, CompanyRecord};
use crate::error::{DashboardError, Result};
use crate::provider::MarketDataProvider;
use crate::render::{Formatter, FormatterFactory};
use crate::series::DateRange;
use crate::stats;

pub use commands::Command;
pub use view::{Statistics, StockView};

/// Prompt shown instead of searching for a blank query
pub const EMPTY_QUERY_PROMPT: &str = "Please enter a company name or stock symbol to search.";

/// Dashboard session
pub struct Dashboard {
    directory: CompanyDirectory,
    provider: Arc<dyn MarketDataProvider>,
    formatter: Box<dyn Formatter>,
    config: DashboardConfig,
    query: Option<String>,
    matches: Vec<CompanyRecord>,
    selected: Option<usize>,
    range: DateRange,
}

impl Dashboard {
    /// Create a session; the date range defaults to the configured lookback
    /// ending today.
    pub fn new(
        directory: CompanyDirectory,
        provider: Arc<dyn MarketDataProvider>,
        config: DashboardConfig,
    ) -> Self {
        let range = DateRange::trailing(Utc::now().date_naive(), config.default_lookback_days);
        let formatter = FormatterFactory::create(&config);

        Self {
            directory,
            provider,
            formatter,
            config,
            query: None,
            matches: Vec::new(),
            selected: None,
            range,
        }
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn matches(&self) -> &[CompanyRecord] {
        &self.matches
    }

    pub fn selected(&self) -> Option<&CompanyRecord> {
        self.selected.and_then(|idx| self.matches.get(idx))
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Search the directory and select the first match.
    ///
    /// Returns `Ok(None)` for a blank query, which is never forwarded to the
    /// directory.
    pub fn search(&mut self, query: &str) -> Result<Option<&[CompanyRecord]>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let matches = self.directory.search(query);
        info!("Search '{}' matched {} companies", query, matches.len());

        if matches.is_empty() {
            return Err(DashboardError::NoMatch {
                query: query.to_string(),
            });
        }

        self.query = Some(query.to_string());
        self.matches = matches;
        self.selected = Some(0);
        Ok(Some(&self.matches))
    }

    /// Select among the current matches by 1-based index, or by exact
    /// name or symbol (ignoring case).
    pub fn select(&mut self, choice: &str) -> Result<&CompanyRecord> {
        if self.matches.is_empty() {
            return Err(DashboardError::Command(
                "Search for a company before selecting one".to_string(),
            ));
        }

        let choice = choice.trim();
        let idx = match choice.parse::<usize>() {
            Ok(n) if (1..=self.matches.len()).contains(&n) => Some(n - 1),
            Ok(_) => None,
            Err(_) => self.matches.iter().position(|r| {
                r.symbol.eq_ignore_ascii_case(choice) || r.name.to_lowercase() == choice.to_lowercase()
            }),
        };

        let idx = idx.ok_or_else(|| {
            DashboardError::Command(format!("'{choice}' is not one of the listed companies"))
        })?;
        self.selected = Some(idx);
        Ok(&self.matches[idx])
    }

    /// Change the date range used for the next fetch
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<DateRange> {
        self.range = DateRange::new(start, end)?;
        Ok(self.range)
    }

    /// Fetch and compute everything for the selected company.
    ///
    /// Provider failures surface as [`DashboardError::ProviderUnavailable`];
    /// statistics that cannot be computed are carried inside the view.
    pub async fn view(&self) -> Result<StockView> {
        let company = self
            .selected()
            .cloned()
            .ok_or_else(|| DashboardError::Command("No company selected".to_string()))?;
        let symbol = company.symbol.to_uppercase();

        let snapshot = self
            .provider
            .fetch_snapshot(&symbol)
            .await
            .map_err(|e| as_provider_error(&symbol, e))?;

        let prices = self
            .provider
            .fetch_series(&symbol, self.range)
            .await
            .map_err(|e| as_provider_error(&symbol, e))?;

        if prices.is_empty() {
            warn!("No price history for {} ({})", symbol, self.range);
        }

        let returns = stats::compute_returns(&prices);
        let statistics = Statistics::from_result(stats::compute_summary(
            &returns,
            self.config.trading_days_per_year,
        ));

        Ok(StockView {
            company,
            range: self.range,
            snapshot,
            prices,
            returns,
            statistics,
            generated_at: Utc::now(),
        })
    }

    /// Process user input and return rendered output.
    ///
    /// Returns `Ok(None)` when the user asked to exit. Recoverable errors
    /// are returned as `Err` for the caller to show inline.
    pub async fn process_input(&mut self, input: &str) -> Result<Option<String>> {
        let command = Command::parse(input)?;
        self.execute_command(command).await
    }

    /// Execute a parsed command
    pub async fn execute_command(&mut self, command: Command) -> Result<Option<String>> {
        let output = match command {
            Command::Search { query } => {
                if self.search(&query)?.is_none() {
                    return Ok(Some(self.formatter.format_message(EMPTY_QUERY_PROMPT)));
                }
                let listing =
                    self.formatter
                        .format_matches(query.trim(), &self.matches, self.selected);
                format!("{listing}\n{}", self.render_selection().await?)
            }
            Command::Select { choice } => {
                self.select(&choice)?;
                self.render_selection().await?
            }
            Command::Range { start, end } => {
                let range = self.set_range(start, end)?;
                if self.selected().is_some() {
                    self.render_selection().await?
                } else {
                    self.formatter
                        .format_message(&format!("Date range set to {range}"))
                }
            }
            Command::Show => self.render_selection().await?,
            Command::Help => self.formatter.format_help(),
            Command::Exit => return Ok(None),
        };

        Ok(Some(output))
    }

    /// Render the current selection, turning provider failures into an
    /// inline message so the match list above stays usable.
    async fn render_selection(&self) -> Result<String> {
        match self.view().await {
            Ok(view) => Ok(self.formatter.format_view(&view)),
            Err(e @ DashboardError::ProviderUnavailable { .. }) => {
                warn!("{}", e);
                Ok(self.formatter.format_error(&e))
            }
            Err(e) => Err(e),
        }
    }
}

fn as_provider_error(symbol: &str, err: DashboardError) -> DashboardError {
    match err {
        e @ DashboardError::ProviderUnavailable { .. } => e,
        other => DashboardError::provider(symbol, other),
    }
}
