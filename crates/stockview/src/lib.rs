//! Interactive stock data viewer
//!
//! Search a local directory of companies, fetch a company's daily price
//! history and market snapshot, and summarize the daily returns as an
//! annualized return, an annualized volatility and their ratio.
//!
//! - [`directory`]: CSV-backed company lookup by name or symbol
//! - [`provider`]: market data behind the [`MarketDataProvider`] trait
//! - [`stats`]: daily returns and summary statistics
//! - [`render`]: terminal tables, a text chart, or JSON
//! - [`dashboard`]: the per-session state machine tying it together
//!
//! # Example
//!
//! ```rust,ignore
//! use stockview::{compute_returns, compute_summary, PriceSeries};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let prices = PriceSeries::from_prices("AAPL", start, &[100.0, 101.0, 99.0, 103.0]);
//! let returns = compute_returns(&prices);
//! let summary = compute_summary(&returns, 252)?;
//! println!("Annual return is {:.2}%", summary.annualized_return_pct);
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod provider;
pub mod render;
pub mod series;
pub mod snapshot;
pub mod stats;

pub use config::{DashboardConfig, DashboardConfigBuilder, OutputFormat};
pub use dashboard::{Command, Dashboard, Statistics, StockView};
pub use directory::{CompanyDirectory, CompanyRecord};
pub use error::{DashboardError, Result};
pub use provider::{MarketDataProvider, YahooProvider};
pub use render::{Formatter, FormatterFactory, JsonFormatter, TerminalFormatter};
pub use series::{DateRange, PricePoint, PriceSeries, ReturnPoint, ReturnSeries};
pub use snapshot::{AttributeValue, Snapshot, SnapshotField};
pub use stats::{SummaryStatistics, compute_returns, compute_summary};
