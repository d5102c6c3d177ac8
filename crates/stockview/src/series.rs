//! Price and return series types

use crate::error::{DashboardError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One trading day's adjusted close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adj_close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, adj_close: f64) -> Self {
        Self { date, adj_close }
    }
}

/// Daily adjusted-close history for one symbol, dates ascending.
///
/// Weekends and holidays are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, sorting by date and dropping repeated dates.
    ///
    /// The first point seen for a date wins.
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        let symbol = symbol.into();

        points.sort_by_key(|p| p.date);
        let original_len = points.len();
        points.dedup_by_key(|p| p.date);
        if points.len() < original_len {
            tracing::warn!(
                "Removed {} duplicate dates from {} series",
                original_len - points.len(),
                symbol
            );
        }

        Self { symbol, points }
    }

    /// Build a series from bare prices on consecutive calendar days
    /// starting at `start`.
    pub fn from_prices(symbol: impl Into<String>, start: NaiveDate, prices: &[f64]) -> Self {
        let points = prices
            .iter()
            .zip(0_i64..)
            .map(|(&price, offset)| PricePoint::new(start + Duration::days(offset), price))
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Lowest and highest finite adjusted close
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|p| p.adj_close)
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// One derived daily return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    /// Adjusted close on `date`
    pub adj_close: f64,
    /// `adj_close / previous adj_close - 1`
    pub pct_change: f64,
}

/// Daily returns derived from a [`PriceSeries`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(points: Vec<ReturnPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.pct_change)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Inclusive calendar date range for a history request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days` days ending on `end`
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_series_sorted_and_deduplicated() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint::new(date(2024, 1, 3), 102.0),
                PricePoint::new(date(2024, 1, 2), 101.0),
                PricePoint::new(date(2024, 1, 3), 999.0),
                PricePoint::new(date(2024, 1, 1), 100.0),
            ],
        );

        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert_eq!(series.points()[2].adj_close, 102.0);
        assert_eq!(series.symbol(), "AAPL");
    }

    #[test]
    fn test_from_prices() {
        let series = PriceSeries::from_prices("X", date(2024, 3, 1), &[1.0, 2.0, 3.0]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), Some(date(2024, 3, 1)));
        assert_eq!(series.last_date(), Some(date(2024, 3, 3)));
    }

    #[test]
    fn test_price_bounds_skip_missing() {
        let series = PriceSeries::from_prices("X", date(2024, 3, 1), &[5.0, f64::NAN, 2.0, 9.0]);
        assert_eq!(series.price_bounds(), Some((2.0, 9.0)));
        assert_eq!(PriceSeries::new("X", vec![]).price_bounds(), None);
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 6, 30)).unwrap();
        assert_eq!(range.to_string(), "2024-01-01 to 2024-06-30");

        assert!(DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
        assert!(matches!(
            DateRange::new(date(2024, 2, 1), date(2024, 1, 1)),
            Err(DashboardError::InvalidDateRange { .. })
        ));

        let trailing = DateRange::trailing(date(2024, 12, 31), 365);
        assert_eq!(trailing.start(), date(2024, 1, 1));
    }
}
