//! Error types for the stock data viewer

use thiserror::Error;

/// Message used when a series is too short to produce any return
pub const INSUFFICIENT_HISTORY: &str = "insufficient price history: need at least 2 trading days";

/// Dashboard errors
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Company directory could not be loaded
    #[error("Company directory unavailable: {0}")]
    DataSource(String),

    /// Search returned nothing
    #[error("No companies found. Please check your input.")]
    NoMatch {
        query: String,
    },

    /// Market data provider failed for a symbol
    #[error("Error fetching data for {symbol}: {reason}")]
    ProviderUnavailable {
        symbol: String,
        reason: String,
    },

    /// Price history too short or too flat to summarize
    #[error("Degenerate price series: {0}")]
    DegenerateSeries(String),

    /// Start date after end date
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Command could not be parsed or applied
    #[error("Command error: {0}")]
    Command(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// Wrap any provider failure with the symbol it concerned
    pub fn provider(symbol: impl Into<String>, reason: impl ToString) -> Self {
        Self::ProviderUnavailable {
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error can be shown inline while the session keeps running
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::DataSource(_) | Self::Config(_))
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
