//! Yahoo Finance API client

use crate::error::{DashboardError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

/// One daily bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

fn to_offset(date: NaiveDate) -> Result<OffsetDateTime> {
    let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DashboardError::Config(format!("Invalid date {date}: {e}")))
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Daily bars from `start` through `end`, both inclusive.
    ///
    /// Errors carry the provider's message; callers attach the symbol.
    pub async fn get_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyQuote>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| DashboardError::provider(symbol, e))?;

        // the upper bound is exclusive on Yahoo's side
        let start_odt = to_offset(start)?;
        let end_odt = to_offset(end + Duration::days(1))?;

        tracing::debug!("Requesting {} history {} to {}", symbol, start, end);

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| DashboardError::provider(symbol, e))?;

        let quotes = response
            .quotes()
            .map_err(|e| DashboardError::provider(symbol, e))?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                let Some(timestamp) = DateTime::from_timestamp(q.timestamp as i64, 0) else {
                    tracing::warn!("Skipping {} bar with bad timestamp {}", symbol, q.timestamp);
                    return None;
                };
                Some(DailyQuote {
                    date: timestamp.date_naive(),
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                    adjclose: q.adjclose,
                })
            })
            .collect())
    }
}
