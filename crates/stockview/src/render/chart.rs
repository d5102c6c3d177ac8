//! Plain-text line chart of adjusted close over time

use crate::series::PriceSeries;

const LABEL_WIDTH: usize = 10;

/// Draw `series` as a `width` x `height` character chart.
///
/// Columns are sampled evenly across the series; the y axis spans the
/// lowest to highest finite price.
pub fn line_chart(series: &PriceSeries, width: usize, height: usize) -> String {
    let points: Vec<_> = series
        .points()
        .iter()
        .filter(|p| p.adj_close.is_finite())
        .collect();

    let Some((lo, hi)) = series.price_bounds() else {
        return format!("{}: no price data to chart\n", series.symbol());
    };
    let (width, height) = (width.max(2), height.max(2));

    let columns = width.min(points.len());
    let rows_for = |value: f64| -> usize {
        if hi > lo {
            (((value - lo) / (hi - lo)) * (height - 1) as f64).round() as usize
        } else {
            height / 2
        }
    };

    // grid[0] is the top row
    let mut grid = vec![vec![' '; columns]; height];
    let mut prev_row: Option<usize> = None;
    for col in 0..columns {
        let idx = if columns > 1 {
            col * (points.len() - 1) / (columns - 1)
        } else {
            0
        };
        let row = rows_for(points[idx].adj_close);

        if let Some(prev) = prev_row {
            for r in prev.min(row) + 1..prev.max(row) {
                grid[height - 1 - r][col] = '|';
            }
        }
        grid[height - 1 - row][col] = '*';
        prev_row = Some(row);
    }

    let mut out = format!("{} adjusted close\n", series.symbol());
    for (i, line) in grid.iter().enumerate() {
        let label = if i == 0 {
            format!("{hi:.2}")
        } else if i == height - 1 {
            format!("{lo:.2}")
        } else {
            String::new()
        };
        let line: String = line.iter().collect();
        out.push_str(&format!("{label:>LABEL_WIDTH$} |{}\n", line.trim_end()));
    }
    out.push_str(&format!("{:>LABEL_WIDTH$} +{}\n", "", "-".repeat(columns)));

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        let span = columns.max(21);
        let gap = span.saturating_sub(20);
        out.push_str(&format!(
            "{:>LABEL_WIDTH$}  {}{}{}\n",
            "",
            first.date,
            " ".repeat(gap),
            last.date
        ));
    }

    out
}
