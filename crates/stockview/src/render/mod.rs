//! Output formatting for dashboard views

pub mod chart;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use serde_json::json;

use crate::config::{DashboardConfig, OutputFormat};
use crate::dashboard::commands::Command;
use crate::dashboard::view::{Statistics, StockView};
use crate::directory::CompanyRecord;
use crate::error::DashboardError;
use crate::series::ReturnSeries;
use crate::snapshot::Snapshot;
use crate::stats::SummaryStatistics;

/// Renders dashboard output for one output format
pub trait Formatter: Send + Sync {
    /// Format this formatter produces
    fn output_format(&self) -> OutputFormat;

    /// Search matches, marking the selected one
    fn format_matches(&self, query: &str, matches: &[CompanyRecord], selected: Option<usize>)
    -> String;

    /// Full view of one company: chart, info panel, prices and statistics
    fn format_view(&self, view: &StockView) -> String;

    /// Plain informational message
    fn format_message(&self, message: &str) -> String;

    /// Error shown inline while the session keeps running
    fn format_error(&self, error: &DashboardError) -> String;

    /// Command help
    fn format_help(&self) -> String;
}

/// Statistic lines as shown under the pricing table
pub fn statistics_lines(summary: &SummaryStatistics) -> [String; 3] {
    [
        format!("Annual return is {:.2}%", summary.annualized_return_pct),
        format!("Standard Deviation is {:.2}%", summary.annualized_std_dev_pct),
        format!("Risk Adjusted Returns is {:.2}", summary.risk_adjusted_return),
    ]
}

pub struct TerminalFormatter {
    chart_width: usize,
    chart_height: usize,
}

impl TerminalFormatter {
    pub fn new(chart_width: usize, chart_height: usize) -> Self {
        Self {
            chart_width,
            chart_height,
        }
    }

    fn table() -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table
    }

    pub fn snapshot_table(snapshot: &Snapshot) -> String {
        let mut table = Self::table();
        for (label, value) in snapshot.rows() {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }
        table.to_string()
    }

    pub fn returns_table(returns: &ReturnSeries) -> String {
        let mut table = Self::table();
        table.set_header(vec!["Date", "Adj Close", "% Change"]);
        for point in returns.points() {
            table.add_row(vec![
                Cell::new(point.date),
                Cell::new(format!("{:.2}", point.adj_close)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:+.2}%", point.pct_change * 100.0))
                    .set_alignment(CellAlignment::Right),
            ]);
        }
        table.to_string()
    }
}

impl Default for TerminalFormatter {
    fn default() -> Self {
        let config = DashboardConfig::default();
        Self::new(config.chart_width, config.chart_height)
    }
}

impl Formatter for TerminalFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Table
    }

    fn format_matches(
        &self,
        query: &str,
        matches: &[CompanyRecord],
        selected: Option<usize>,
    ) -> String {
        let mut table = Self::table();
        table.set_header(vec!["#", "Company", "Symbol"]);
        for (idx, record) in matches.iter().enumerate() {
            let marker = if selected == Some(idx) { ">" } else { " " };
            table.add_row(vec![
                Cell::new(format!("{marker}{}", idx + 1)),
                Cell::new(&record.name),
                Cell::new(&record.symbol),
            ]);
        }
        format!("Companies matching '{query}':\n{table}\n")
    }

    fn format_view(&self, view: &StockView) -> String {
        let mut out = String::new();

        out.push_str(&format!("== {} ==\n", view.title()));
        out.push_str(&format!("{} ({})\n\n", view.company.name, view.range));
        out.push_str(&chart::line_chart(
            &view.prices,
            self.chart_width,
            self.chart_height,
        ));

        out.push_str("\n-- Main Info --\n");
        out.push_str(&Self::snapshot_table(&view.snapshot));
        out.push('\n');

        out.push_str("\n-- Pricing Data --\nPrice Movements\n");
        match &view.statistics {
            Statistics::Ready(summary) => {
                out.push_str(&Self::returns_table(&view.returns));
                out.push('\n');
                for line in statistics_lines(summary) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            Statistics::Unavailable { reason } => {
                out.push_str(&format!("Statistics unavailable: {reason}\n"));
            }
        }

        out
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &DashboardError) -> String {
        format!("Error: {error}")
    }

    fn format_help(&self) -> String {
        Command::help_text().to_string()
    }
}

/// Compact JSON, one document per line, so a search prints its matches
/// and the selected view as two lines.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn format_matches(
        &self,
        query: &str,
        matches: &[CompanyRecord],
        selected: Option<usize>,
    ) -> String {
        json!({
            "query": query,
            "matches": matches,
            "selected": selected.and_then(|idx| matches.get(idx)),
        })
        .to_string()
    }

    fn format_view(&self, view: &StockView) -> String {
        serde_json::to_string(view).unwrap_or_else(|e| {
            json!({ "error": format!("failed to encode view: {e}") }).to_string()
        })
    }

    fn format_message(&self, message: &str) -> String {
        json!({ "message": message }).to_string()
    }

    fn format_error(&self, error: &DashboardError) -> String {
        json!({ "error": error.to_string() }).to_string()
    }

    fn format_help(&self) -> String {
        json!({ "help": Command::help_text().trim() }).to_string()
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(config: &DashboardConfig) -> Box<dyn Formatter> {
        match config.output_format {
            OutputFormat::Table => Box::new(TerminalFormatter::new(
                config.chart_width,
                config.chart_height,
            )),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{DateRange, PriceSeries};
    use crate::snapshot::SnapshotField;
    use crate::stats::{compute_returns, compute_summary};
    use chrono::{NaiveDate, Utc};

    fn view(prices: &[f64]) -> StockView {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let prices = PriceSeries::from_prices("AAPL", start, prices);
        let returns = compute_returns(&prices);
        let statistics = Statistics::from_result(compute_summary(&returns, 252));

        StockView {
            company: CompanyRecord::new("Apple Inc", "AAPL"),
            range: DateRange::new(start, start + chrono::Duration::days(10)).unwrap(),
            snapshot: Snapshot::new("AAPL").with(SnapshotField::Sector, "Technology"),
            prices,
            returns,
            statistics,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_statistics_lines() {
        let lines = statistics_lines(&SummaryStatistics {
            annualized_return_pct: 257.057,
            annualized_std_dev_pct: 39.0186,
            risk_adjusted_return: 6.588,
        });
        assert_eq!(lines[0], "Annual return is 257.06%");
        assert_eq!(lines[1], "Standard Deviation is 39.02%");
        assert_eq!(lines[2], "Risk Adjusted Returns is 6.59");
    }

    #[test]
    fn test_terminal_view() {
        let output = TerminalFormatter::default().format_view(&view(&[100.0, 101.0, 99.0, 103.0]));

        assert!(output.contains("Stock Data for AAPL"));
        assert!(output.contains("Technology"));
        assert!(output.contains("Market Cap"));
        assert!(output.contains("N/A"));
        assert!(output.contains("+1.00%"));
        assert!(output.contains("-1.98%"));
        assert!(output.contains("Annual return is 257.06%"));
        assert!(output.contains("Risk Adjusted Returns is 6.59"));
    }

    #[test]
    fn test_terminal_view_degenerate() {
        let output = TerminalFormatter::default().format_view(&view(&[100.0]));
        assert!(output.contains("Statistics unavailable"));
        assert!(output.contains("need at least 2 trading days"));
        assert!(!output.contains("Annual return is"));
    }

    #[test]
    fn test_terminal_matches_marks_selection() {
        let matches = vec![
            CompanyRecord::new("Apple Inc", "AAPL"),
            CompanyRecord::new("Applied Materials", "AMAT"),
        ];
        let output = TerminalFormatter::default().format_matches("app", &matches, Some(1));
        assert!(output.contains("Companies matching 'app'"));
        assert!(output.contains(">2"));
        assert!(output.contains("AMAT"));
    }

    #[test]
    fn test_json_formatter() {
        let formatter = JsonFormatter;
        let output = formatter.format_view(&view(&[100.0, 101.0, 99.0, 103.0]));
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["company"]["name"], "Apple Inc");
        assert_eq!(json["returns"]["points"].as_array().unwrap().len(), 3);

        assert!(!output.contains('\n'));

        let err = formatter.format_error(&DashboardError::provider("AAPL", "down"));
        let json: serde_json::Value = serde_json::from_str(&err).unwrap();
        assert_eq!(json["error"], "Error fetching data for AAPL: down");
    }

    #[test]
    fn test_factory() {
        let config = DashboardConfig::default();
        assert_eq!(FormatterFactory::create(&config).output_format(), OutputFormat::Table);

        let config = DashboardConfig {
            output_format: OutputFormat::Json,
            ..Default::default()
        };
        assert_eq!(FormatterFactory::create(&config).output_format(), OutputFormat::Json);
    }
}
