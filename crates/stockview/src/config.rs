//! Configuration for the stock data viewer

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Trading days per year used to annualize daily figures
pub const DEFAULT_TRADING_DAYS_PER_YEAR: u32 = 252;

/// Output format for rendered views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and chart
    #[default]
    Table,
    /// One JSON document per view
    Json,
}

/// Configuration for a dashboard session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// CSV file with `company` and `symbol` columns
    pub companies_path: PathBuf,

    /// Annualization constant for return statistics
    pub trading_days_per_year: u32,

    /// Length of the default date range, ending today
    pub default_lookback_days: u32,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Alpha Vantage API key (optional, enriches snapshots)
    pub alpha_vantage_api_key: Option<String>,

    /// Alpha Vantage requests per minute
    pub alpha_vantage_rate_limit: u32,

    /// Chart width in columns
    pub chart_width: usize,

    /// Chart height in rows
    pub chart_height: usize,

    /// How views are rendered
    pub output_format: OutputFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            companies_path: PathBuf::from("data/companies.csv"),
            trading_days_per_year: DEFAULT_TRADING_DAYS_PER_YEAR,
            default_lookback_days: 365,
            request_timeout: Duration::from_secs(30),
            alpha_vantage_api_key: None,
            alpha_vantage_rate_limit: 5, // free tier
            chart_width: 60,
            chart_height: 12,
            output_format: OutputFormat::Table,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.trading_days_per_year == 0 {
            return Err(DashboardError::Config(
                "trading_days_per_year must be greater than 0".to_string(),
            ));
        }

        if self.default_lookback_days == 0 {
            return Err(DashboardError::Config(
                "default_lookback_days must be greater than 0".to_string(),
            ));
        }

        if self.chart_width < 2 || self.chart_height < 2 {
            return Err(DashboardError::Config(
                "chart must be at least 2x2".to_string(),
            ));
        }

        if self.alpha_vantage_api_key.is_some() && self.alpha_vantage_rate_limit == 0 {
            return Err(DashboardError::Config(
                "alpha_vantage_rate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    companies_path: Option<PathBuf>,
    trading_days_per_year: Option<u32>,
    default_lookback_days: Option<u32>,
    request_timeout: Option<Duration>,
    alpha_vantage_api_key: Option<String>,
    alpha_vantage_rate_limit: Option<u32>,
    chart_width: Option<usize>,
    chart_height: Option<usize>,
    output_format: Option<OutputFormat>,
}

impl DashboardConfigBuilder {
    /// Set the companies CSV path
    pub fn companies_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.companies_path = Some(path.into());
        self
    }

    /// Set the annualization constant
    pub fn trading_days_per_year(mut self, days: u32) -> Self {
        self.trading_days_per_year = Some(days);
        self
    }

    /// Set the default lookback window
    pub fn default_lookback_days(mut self, days: u32) -> Self {
        self.default_lookback_days = Some(days);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set Alpha Vantage requests per minute
    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    /// Set chart dimensions
    pub fn chart_size(mut self, width: usize, height: usize) -> Self {
        self.chart_width = Some(width);
        self.chart_height = Some(height);
        self
    }

    /// Set the output format
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Load API key and overrides from the environment.
    ///
    /// Reads `ALPHA_VANTAGE_API_KEY`, `STOCKVIEW_COMPANIES` and
    /// `STOCKVIEW_TRADING_DAYS`. Values already set on the builder win.
    pub fn with_env(mut self) -> Self {
        if self.alpha_vantage_api_key.is_none() {
            self.alpha_vantage_api_key = std::env::var("ALPHA_VANTAGE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
        if self.companies_path.is_none() {
            self.companies_path = std::env::var_os("STOCKVIEW_COMPANIES").map(PathBuf::from);
        }
        if self.trading_days_per_year.is_none() {
            match std::env::var("STOCKVIEW_TRADING_DAYS").map(|v| v.parse::<u32>()) {
                Ok(Ok(days)) => self.trading_days_per_year = Some(days),
                Ok(Err(e)) => tracing::warn!("Ignoring STOCKVIEW_TRADING_DAYS: {}", e),
                Err(_) => {}
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            companies_path: self.companies_path.unwrap_or(defaults.companies_path),
            trading_days_per_year: self
                .trading_days_per_year
                .unwrap_or(defaults.trading_days_per_year),
            default_lookback_days: self
                .default_lookback_days
                .unwrap_or(defaults.default_lookback_days),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
            chart_width: self.chart_width.unwrap_or(defaults.chart_width),
            chart_height: self.chart_height.unwrap_or(defaults.chart_height),
            output_format: self.output_format.unwrap_or(defaults.output_format),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.trading_days_per_year, 252);
        assert_eq!(config.output_format, OutputFormat::Table);
        assert!(config.alpha_vantage_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::builder()
            .companies_path("/tmp/companies.csv")
            .trading_days_per_year(260)
            .request_timeout(Duration::from_secs(5))
            .output_format(OutputFormat::Json)
            .build()
            .unwrap();

        assert_eq!(config.companies_path, PathBuf::from("/tmp/companies.csv"));
        assert_eq!(config.trading_days_per_year, 260);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    // Single test so the variables are never touched by two tests at once
    #[test]
    fn test_config_with_env() {
        unsafe {
            std::env::set_var("STOCKVIEW_TRADING_DAYS", "250");
            std::env::set_var("STOCKVIEW_COMPANIES", "/data/listed.csv");
            std::env::set_var("ALPHA_VANTAGE_API_KEY", "env-key");
        }

        let config = DashboardConfig::builder().with_env().build().unwrap();
        assert_eq!(config.trading_days_per_year, 250);
        assert_eq!(config.companies_path, PathBuf::from("/data/listed.csv"));
        assert_eq!(config.alpha_vantage_api_key.as_deref(), Some("env-key"));

        // values set on the builder win over the environment
        let config = DashboardConfig::builder()
            .trading_days_per_year(52)
            .companies_path("cli.csv")
            .alpha_vantage_api_key("cli-key")
            .with_env()
            .build()
            .unwrap();
        assert_eq!(config.trading_days_per_year, 52);
        assert_eq!(config.companies_path, PathBuf::from("cli.csv"));
        assert_eq!(config.alpha_vantage_api_key.as_deref(), Some("cli-key"));

        // unparsable and blank values fall back to defaults
        unsafe {
            std::env::set_var("STOCKVIEW_TRADING_DAYS", "many");
            std::env::set_var("ALPHA_VANTAGE_API_KEY", "  ");
        }
        let config = DashboardConfig::builder().with_env().build().unwrap();
        assert_eq!(config.trading_days_per_year, DEFAULT_TRADING_DAYS_PER_YEAR);
        assert!(config.alpha_vantage_api_key.is_none());

        unsafe {
            std::env::remove_var("STOCKVIEW_TRADING_DAYS");
            std::env::remove_var("STOCKVIEW_COMPANIES");
            std::env::remove_var("ALPHA_VANTAGE_API_KEY");
        }
    }

    #[test]
    fn test_validation_zero_trading_days() {
        let result = DashboardConfig::builder().trading_days_per_year(0).build();
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_validation_tiny_chart() {
        let config = DashboardConfig {
            chart_width: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rate_limit_with_key() {
        let config = DashboardConfig {
            alpha_vantage_api_key: Some("test_key".to_string()),
            alpha_vantage_rate_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DashboardConfig {
            alpha_vantage_api_key: None,
            alpha_vantage_rate_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
