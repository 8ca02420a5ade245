use chrono::NaiveDate;

use crate::config::NORMALIZED_SCALE;
use crate::report::correlation_lines;
use crate::types::{AlignedRow, CorrelationResult};

/// Plot-ready series derived from the aligned table. Dates become day offsets
/// from the first aligned date so gaps (weekends) stay visible on the x axis.
#[derive(Debug, Clone)]
pub struct ChartView {
    pub title: String,
    pub sentiment_line: Vec<(f64, f64)>,
    pub price_line: Vec<(f64, f64)>,
    /// (normalized_sentiment, price_change)
    pub scatter: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub change_bounds: [f64; 2],
    pub date_labels: Vec<String>,
    pub change_labels: Vec<String>,
    pub summary: String,
}

impl ChartView {
    /// None when there is nothing to draw.
    pub fn new(
        company: &str,
        rows: &[AlignedRow],
        correlation: Option<&CorrelationResult>,
    ) -> Option<Self> {
        let first = rows.first()?.date;
        let last = rows.last()?.date;
        let offset = |d: NaiveDate| (d - first).num_days() as f64;

        let sentiment_line = rows
            .iter()
            .map(|r| (offset(r.date), r.normalized_sentiment))
            .collect();
        let price_line = rows
            .iter()
            .map(|r| (offset(r.date), r.normalized_stock_price))
            .collect();
        let scatter = rows
            .iter()
            .map(|r| (r.normalized_sentiment, r.price_change))
            .collect();

        let span = offset(last).max(1.0);
        let mid = first + chrono::Duration::days((span / 2.0).round() as i64);
        let right = first + chrono::Duration::days(span as i64);
        let date_labels = vec![format_day(first), format_day(mid), format_day(right)];

        let change_bounds = padded_bounds(rows.iter().map(|r| r.price_change));
        let change_labels = vec![
            format!("{:.1}%", change_bounds[0]),
            format!("{:.1}%", (change_bounds[0] + change_bounds[1]) / 2.0),
            format!("{:.1}%", change_bounds[1]),
        ];

        let summary = match correlation {
            Some(result) => correlation_lines(result).join("  "),
            None => "Correlation unavailable".to_string(),
        };

        Some(Self {
            title: company.to_string(),
            sentiment_line,
            price_line,
            scatter,
            x_bounds: [0.0, span],
            change_bounds,
            date_labels,
            change_labels,
            summary,
        })
    }

    pub fn normalized_bounds(&self) -> [f64; 2] {
        [0.0, NORMALIZED_SCALE]
    }
}

fn format_day(d: NaiveDate) -> String {
    d.format("%m-%d").to_string()
}

/// Min/max with 10% headroom; a flat or empty series gets a ±1 band.
fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    if max - min == 0.0 {
        return [min - 1.0, max + 1.0];
    }
    let pad = (max - min) * 0.1;
    [min - pad, max + pad]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Significance, Strength};

    fn row(date: &str, sentiment: f64, price: f64, change: f64) -> AlignedRow {
        AlignedRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            daily_sentiment_score: 0.0,
            close: 0.0,
            volume: 0,
            price_change: change,
            normalized_sentiment: sentiment,
            normalized_stock_price: price,
        }
    }

    #[test]
    fn empty_table_has_no_view() {
        assert!(ChartView::new("Acme", &[], None).is_none());
    }

    #[test]
    fn x_axis_is_day_offsets() {
        let rows = vec![
            row("2024-03-08", 0.0, 100.0, 0.0),
            row("2024-03-11", 100.0, 0.0, -2.0),
            row("2024-03-12", 50.0, 40.0, 3.0),
        ];
        let view = ChartView::new("Acme", &rows, None).unwrap();

        assert_eq!(view.sentiment_line, vec![(0.0, 0.0), (3.0, 100.0), (4.0, 50.0)]);
        assert_eq!(view.price_line[1], (3.0, 0.0));
        assert_eq!(view.scatter[2], (50.0, 3.0));
        assert_eq!(view.x_bounds, [0.0, 4.0]);
        assert_eq!(view.date_labels, vec!["03-08", "03-10", "03-12"]);
        assert!(view.change_bounds[0] < -2.0 && view.change_bounds[1] > 3.0);
        assert_eq!(view.summary, "Correlation unavailable");
    }

    #[test]
    fn single_row_gets_non_degenerate_bounds() {
        let view = ChartView::new("Acme", &[row("2024-03-08", 0.0, 0.0, 0.0)], None).unwrap();
        assert_eq!(view.x_bounds, [0.0, 1.0]);
        assert_eq!(view.date_labels, vec!["03-08", "03-09", "03-09"]);
        assert_eq!(view.change_bounds, [-1.0, 1.0]);
    }

    #[test]
    fn summary_carries_correlation() {
        let result = CorrelationResult {
            coefficient: -0.42,
            p_value: 0.01,
            strength: Strength::Strong,
            significance: Significance::Significant,
            sample_size: 20,
        };
        let rows = vec![row("2024-03-08", 0.0, 0.0, 0.0), row("2024-03-09", 1.0, 1.0, 1.0)];
        let view = ChartView::new("Acme", &rows, Some(&result)).unwrap();
        assert!(view.summary.starts_with("Correlation: -0.42, P-value: 0.01"));
    }
}
