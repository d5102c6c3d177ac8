//! Return and risk statistics over a daily adjusted-close series.
//!
//! The pipeline has two steps:
//!
//! 1. [`compute_returns`] turns prices into daily percent changes, dropping
//!    the first day and any day whose ratio is undefined.
//! 2. [`compute_summary`] annualizes the mean and the population standard
//!    deviation of those changes and divides one by the other.
//!
//! Inputs that would make the summary meaningless (no returns at all, or a
//! volatility of zero) are reported as [`DashboardError::DegenerateSeries`]
//! instead of leaking NaN or infinity to the display.

use crate::config::DEFAULT_TRADING_DAYS_PER_YEAR;
use crate::error::{DashboardError, INSUFFICIENT_HISTORY, Result};
use crate::series::{PriceSeries, ReturnPoint, ReturnSeries};
use serde::{Deserialize, Serialize};

/// Annualized standard deviations (in percentage points) below this are zero.
///
/// A constant return series still produces rounding noise around 1e-13.
pub const VOLATILITY_EPSILON: f64 = 1e-9;

/// Annualized return/risk figures for one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Mean daily return x trading days x 100
    pub annualized_return_pct: f64,
    /// Population std dev of daily returns x sqrt(trading days) x 100
    pub annualized_std_dev_pct: f64,
    /// Return over volatility, no risk-free rate
    pub risk_adjusted_return: f64,
}

/// Daily percent changes of the adjusted close.
///
/// Yields one row per adjacent pair of prices whose ratio is defined, dated on
/// the later day. Fewer than two prices give an empty series.
pub fn compute_returns(series: &PriceSeries) -> ReturnSeries {
    let points = series
        .points()
        .windows(2)
        .filter_map(|pair| {
            let (prev, cur) = (pair[0], pair[1]);
            if !prev.adj_close.is_finite() || prev.adj_close <= 0.0 || !cur.adj_close.is_finite()
            {
                return None;
            }
            let pct_change = cur.adj_close / prev.adj_close - 1.0;
            // a tiny prior price can overflow the ratio
            if !pct_change.is_finite() {
                return None;
            }
            Some(ReturnPoint {
                date: cur.date,
                adj_close: cur.adj_close,
                pct_change,
            })
        })
        .collect::<Vec<_>>();

    let dropped = series.len().saturating_sub(1) - points.len();
    if dropped > 0 {
        tracing::debug!(
            "Dropped {} undefined returns from {} series",
            dropped,
            series.symbol()
        );
    }

    ReturnSeries::new(points)
}

fn require_values(returns: &ReturnSeries) -> Result<Vec<f64>> {
    if returns.is_empty() {
        return Err(DashboardError::DegenerateSeries(INSUFFICIENT_HISTORY.to_string()));
    }
    Ok(returns.values().collect())
}

fn require_finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DashboardError::DegenerateSeries(
            "returns overflow the floating-point range".to_string(),
        ))
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with denominator N
fn population_std_dev(values: &[f64]) -> f64 {
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean daily return scaled to a year, in percent
pub fn annualized_return_pct(returns: &ReturnSeries, trading_days_per_year: u32) -> Result<f64> {
    let values = require_values(returns)?;
    require_finite(mean(&values) * f64::from(trading_days_per_year) * 100.0)
}

/// Population standard deviation of daily returns scaled to a year, in percent.
///
/// Values below [`VOLATILITY_EPSILON`] are reported as exactly `0.0`.
pub fn annualized_std_dev_pct(returns: &ReturnSeries, trading_days_per_year: u32) -> Result<f64> {
    let values = require_values(returns)?;
    let pct = require_finite(
        population_std_dev(&values) * f64::from(trading_days_per_year).sqrt() * 100.0,
    )?;
    Ok(if pct < VOLATILITY_EPSILON { 0.0 } else { pct })
}

/// Annualized return, volatility and their ratio.
pub fn compute_summary(
    returns: &ReturnSeries,
    trading_days_per_year: u32,
) -> Result<SummaryStatistics> {
    let annualized_return_pct = annualized_return_pct(returns, trading_days_per_year)?;
    let annualized_std_dev_pct = annualized_std_dev_pct(returns, trading_days_per_year)?;

    if annualized_std_dev_pct < VOLATILITY_EPSILON {
        return Err(DashboardError::DegenerateSeries(
            "standard deviation of returns is zero; risk-adjusted return is undefined"
                .to_string(),
        ));
    }

    Ok(SummaryStatistics {
        annualized_return_pct,
        annualized_std_dev_pct,
        risk_adjusted_return: annualized_return_pct / annualized_std_dev_pct,
    })
}

/// [`compute_summary`] with 252 trading days
pub fn compute_default_summary(returns: &ReturnSeries) -> Result<SummaryStatistics> {
    compute_summary(returns, DEFAULT_TRADING_DAYS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::PricePoint;
    use chrono::NaiveDate;

    const TOL: f64 = 1e-2;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_prices("TEST", start(), prices)
    }

    #[test]
    fn test_returns_reference_example() {
        let returns = compute_returns(&series(&[100.0, 101.0, 99.0, 103.0]));
        let values: Vec<f64> = returns.values().collect();

        assert_eq!(values.len(), 3);
        assert!((values[0] - 0.01).abs() < 1e-6);
        assert!((values[1] - (-0.019_802)).abs() < 1e-6);
        assert!((values[2] - 0.040_404).abs() < 1e-6);
    }

    #[test]
    fn test_returns_drop_first_day() {
        let prices = [10.0, 11.0, 12.5, 12.0, 13.1];
        let s = series(&prices);
        let returns = compute_returns(&s);

        assert_eq!(returns.len(), prices.len() - 1);
        assert_eq!(returns.points()[0].date, s.points()[1].date);
        for (i, point) in returns.points().iter().enumerate() {
            let expected = prices[i + 1] / prices[i] - 1.0;
            assert!((point.pct_change - expected).abs() < 1e-12);
            assert_eq!(point.adj_close, prices[i + 1]);
        }
    }

    #[test]
    fn test_returns_short_series_empty() {
        assert!(compute_returns(&series(&[])).is_empty());
        assert!(compute_returns(&series(&[42.0])).is_empty());
    }

    #[test]
    fn test_returns_skip_undefined_pairs() {
        // zero prior price and a missing price
        let returns = compute_returns(&series(&[0.0, 5.0, f64::NAN, 6.0, 6.6]));
        let values: Vec<f64> = returns.values().collect();

        // only 6.0 -> 6.6 is defined
        assert_eq!(values.len(), 1);
        assert!((values[0] - 0.1).abs() < 1e-12);
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_return_dates_come_from_source() {
        let s = PriceSeries::new(
            "GAP",
            vec![
                PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 10.0),
                PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), 11.0),
                PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(), 12.0),
            ],
        );
        let returns = compute_returns(&s);
        let source: Vec<_> = s.points().iter().map(|p| p.date).collect();
        assert!(returns.points().iter().all(|r| source.contains(&r.date)));
    }

    #[test]
    fn test_summary_reference_example() {
        let returns = compute_returns(&series(&[100.0, 101.0, 99.0, 103.0]));
        let summary = compute_summary(&returns, 252).unwrap();

        assert!((summary.annualized_return_pct - 257.057).abs() < TOL);
        assert!((summary.annualized_std_dev_pct - 39.019).abs() < TOL);
        assert!((summary.risk_adjusted_return - 6.588).abs() < TOL);
        assert!(
            (summary.risk_adjusted_return
                - summary.annualized_return_pct / summary.annualized_std_dev_pct)
                .abs()
                < 1e-12
        );
    }

    #[test]
    fn test_summary_uses_population_std_dev() {
        // returns +10% and -10%: population std dev = 0.1, sample = 0.1414
        let returns = compute_returns(&series(&[100.0, 110.0, 99.0]));
        let std = annualized_std_dev_pct(&returns, 1).unwrap();
        assert!((std - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_empty_is_degenerate() {
        let result = compute_summary(&ReturnSeries::default(), 252);
        match result {
            Err(DashboardError::DegenerateSeries(msg)) => {
                assert_eq!(msg, INSUFFICIENT_HISTORY);
            }
            other => panic!("Expected DegenerateSeries, got {other:?}"),
        }
        assert!(annualized_return_pct(&ReturnSeries::default(), 252).is_err());
    }

    #[test]
    fn test_summary_constant_returns_is_degenerate() {
        let prices: Vec<f64> = std::iter::successors(Some(100.0_f64), |p| Some(p * 1.01))
            .take(30)
            .collect();
        let returns = compute_returns(&series(&prices));

        assert_eq!(annualized_std_dev_pct(&returns, 252).unwrap(), 0.0);
        assert!(matches!(
            compute_summary(&returns, 252),
            Err(DashboardError::DegenerateSeries(_))
        ));
    }

    #[test]
    fn test_returns_drop_overflowing_ratio() {
        let returns = compute_returns(&series(&[1e-10, 1e308, 1e308]));
        let values: Vec<f64> = returns.values().collect();
        assert_eq!(values, vec![0.0]);

        // the one remaining return has zero deviation
        assert!(matches!(
            compute_summary(&returns, 252),
            Err(DashboardError::DegenerateSeries(_))
        ));
    }

    #[test]
    fn test_summary_rejects_overflowing_mean() {
        let returns = ReturnSeries::new(
            [f64::MAX, f64::MAX / 2.0]
                .iter()
                .zip(1_i64..)
                .map(|(&pct_change, day)| ReturnPoint {
                    date: start() + chrono::Duration::days(day),
                    adj_close: 1.0,
                    pct_change,
                })
                .collect(),
        );
        assert!(matches!(
            annualized_return_pct(&returns, 252),
            Err(DashboardError::DegenerateSeries(_))
        ));
        assert!(compute_summary(&returns, 252).is_err());
    }

    #[test]
    fn test_summary_flat_prices_is_degenerate() {
        let returns = compute_returns(&series(&[50.0, 50.0, 50.0]));
        assert!(compute_default_summary(&returns).is_err());
    }

    #[test]
    fn test_trading_days_parameter() {
        let returns = compute_returns(&series(&[100.0, 101.0, 99.0, 103.0]));
        let default = compute_default_summary(&returns).unwrap();
        let weekly = compute_summary(&returns, 52).unwrap();

        let ratio = default.annualized_return_pct / weekly.annualized_return_pct;
        assert!((ratio - 252.0 / 52.0).abs() < 1e-9);
        assert!(weekly.annualized_std_dev_pct < default.annualized_std_dev_pct);
    }
}
