//! Assembled dashboard view for one company

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::CompanyRecord;
use crate::error::DashboardError;
use crate::series::{DateRange, PriceSeries, ReturnSeries};
use crate::snapshot::Snapshot;
use crate::stats::SummaryStatistics;

/// Summary statistics, or why they could not be computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Statistics {
    Ready(SummaryStatistics),
    Unavailable { reason: String },
}

impl Statistics {
    pub fn from_result(result: crate::error::Result<SummaryStatistics>) -> Self {
        match result {
            Ok(summary) => Statistics::Ready(summary),
            Err(DashboardError::DegenerateSeries(reason)) => Statistics::Unavailable { reason },
            Err(other) => Statistics::Unavailable {
                reason: other.to_string(),
            },
        }
    }

    pub fn summary(&self) -> Option<&SummaryStatistics> {
        match self {
            Statistics::Ready(summary) => Some(summary),
            Statistics::Unavailable { .. } => None,
        }
    }
}

/// Everything rendered for the selected company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockView {
    pub company: CompanyRecord,
    pub range: DateRange,
    pub snapshot: Snapshot,
    pub prices: PriceSeries,
    pub returns: ReturnSeries,
    pub statistics: Statistics,
    pub generated_at: DateTime<Utc>,
}

impl StockView {
    pub fn symbol(&self) -> &str {
        &self.company.symbol
    }

    pub fn title(&self) -> String {
        format!("Stock Data for {}", self.company.symbol.to_uppercase())
    }
}
