//! Market data provider seam
//!
//! The dashboard only talks to [`MarketDataProvider`]. [`YahooProvider`] is
//! the production implementation: Yahoo Finance for prices, optionally
//! enriched with Alpha Vantage company fundamentals.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::api::alpha_vantage::{parse_number, parse_text};
use crate::api::{AlphaVantageClient, CompanyOverview, DailyQuote, YahooFinanceClient};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::series::{DateRange, PricePoint, PriceSeries};
use crate::snapshot::{Snapshot, SnapshotField};

/// Source of price history and descriptive attributes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily adjusted closes for `symbol` within `range`.
    ///
    /// Unknown symbols or empty ranges may produce an empty series rather
    /// than an error.
    async fn fetch_series(&self, symbol: &str, range: DateRange) -> Result<PriceSeries>;

    /// Descriptive attributes; any field may be missing.
    async fn fetch_snapshot(&self, symbol: &str) -> Result<Snapshot>;
}

/// Yahoo Finance backed provider
pub struct YahooProvider {
    yahoo_client: YahooFinanceClient,
    alpha_vantage_client: Option<AlphaVantageClient>,
}

impl YahooProvider {
    /// Create a provider from configuration.
    ///
    /// An Alpha Vantage client is created only when an API key is set.
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let alpha_vantage_client = config
            .alpha_vantage_api_key
            .as_ref()
            .map(|key| {
                AlphaVantageClient::new(
                    key.clone(),
                    config.alpha_vantage_rate_limit,
                    config.request_timeout,
                )
            })
            .transpose()?;

        if alpha_vantage_client.is_none() {
            debug!("No Alpha Vantage key; snapshots limited to price-derived fields");
        }

        Ok(Self {
            yahoo_client: YahooFinanceClient::new(),
            alpha_vantage_client,
        })
    }

    async fn overview_snapshot(&self, symbol: &str) -> Option<Snapshot> {
        let client = self.alpha_vantage_client.as_ref()?;
        match client.get_company_overview(symbol).await {
            Ok(overview) => Some(overview_to_snapshot(symbol, &overview)),
            Err(e) => {
                warn!("Alpha Vantage overview unavailable for {}: {}", symbol, e);
                None
            }
        }
    }
}

/// Convert daily bars into a price series of adjusted closes
pub fn quotes_to_series(symbol: &str, quotes: &[DailyQuote]) -> PriceSeries {
    let points = quotes
        .iter()
        .map(|q| PricePoint::new(q.date, q.adjclose))
        .collect();
    PriceSeries::new(symbol, points)
}

/// Snapshot fields derivable from a trailing year of daily bars
pub fn quotes_to_snapshot(symbol: &str, quotes: &[DailyQuote]) -> Snapshot {
    let mut snapshot = Snapshot::new(symbol);

    let mut sorted: Vec<&DailyQuote> = quotes.iter().collect();
    sorted.sort_by_key(|q| q.date);

    if let Some(latest) = sorted.last() {
        snapshot.set(SnapshotField::Open, latest.open);
        snapshot.set(SnapshotField::DayHigh, latest.high);
        snapshot.set(SnapshotField::DayLow, latest.low);
        snapshot.set(SnapshotField::Volume, latest.volume);
    }
    if sorted.len() >= 2 {
        snapshot.set(SnapshotField::PreviousClose, sorted[sorted.len() - 2].close);
    }

    let highs = sorted.iter().map(|q| q.high).filter(|v| v.is_finite());
    let lows = sorted.iter().map(|q| q.low).filter(|v| v.is_finite());
    snapshot.set_opt(SnapshotField::FiftyTwoWeekHigh, highs.reduce(f64::max));
    snapshot.set_opt(SnapshotField::FiftyTwoWeekLow, lows.reduce(f64::min));

    if !sorted.is_empty() {
        let total: u64 = sorted.iter().map(|q| q.volume).sum();
        snapshot.set(SnapshotField::AverageVolume, total / sorted.len() as u64);
    }

    snapshot
}

/// Snapshot fields supplied by an Alpha Vantage overview
pub fn overview_to_snapshot(symbol: &str, overview: &CompanyOverview) -> Snapshot {
    let mut snapshot = Snapshot::new(symbol);

    snapshot.set_opt(SnapshotField::LongName, parse_text(overview.name.as_deref()));
    snapshot.set_opt(SnapshotField::Sector, parse_text(overview.sector.as_deref()));
    snapshot.set_opt(SnapshotField::Industry, parse_text(overview.industry.as_deref()));
    snapshot.set_opt(
        SnapshotField::MarketCap,
        parse_number(overview.market_cap.as_deref())
            .filter(|cap| *cap >= 0.0)
            .map(|cap| cap.round() as u64),
    );
    snapshot.set_opt(
        SnapshotField::DividendYield,
        parse_number(overview.dividend_yield.as_deref()),
    );
    snapshot.set_opt(SnapshotField::ForwardPe, parse_number(overview.forward_pe.as_deref()));
    snapshot.set_opt(
        SnapshotField::PriceToBook,
        parse_number(overview.price_to_book.as_deref()),
    );
    snapshot.set_opt(
        SnapshotField::FiftyTwoWeekHigh,
        parse_number(overview.week_52_high.as_deref()),
    );
    snapshot.set_opt(
        SnapshotField::FiftyTwoWeekLow,
        parse_number(overview.week_52_low.as_deref()),
    );

    snapshot
}

fn trailing_year(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(365), today)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_series(&self, symbol: &str, range: DateRange) -> Result<PriceSeries> {
        let symbol = symbol.to_uppercase();
        let quotes = self
            .yahoo_client
            .get_daily_history(&symbol, range.start(), range.end())
            .await?;

        debug!("Fetched {} daily bars for {} ({})", quotes.len(), symbol, range);
        Ok(quotes_to_series(&symbol, &quotes))
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Result<Snapshot> {
        let symbol = symbol.to_uppercase();
        let (start, end) = trailing_year(Utc::now().date_naive());

        let quotes = self
            .yahoo_client
            .get_daily_history(&symbol, start, end)
            .await?;
        let mut snapshot = quotes_to_snapshot(&symbol, &quotes);

        // Alpha Vantage values win where both sources report a field
        if let Some(mut overview) = self.overview_snapshot(&symbol).await {
            overview.fill_missing_from(snapshot);
            snapshot = overview;
        }

        Ok(snapshot)
    }
}
