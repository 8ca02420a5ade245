use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::info;

use crate::config::NORMALIZED_SCALE;
use crate::types::{AlignedRow, DailySentimentPoint, PriceBar};

/// Inner-join daily sentiment to price bars on exact date, sort ascending,
/// derive day-over-day price change and the two [0, 100] display columns.
///
/// Sentiment days without a trading day (weekends, holidays) are dropped, as
/// are trading days without headlines.
pub fn align_and_scale(daily: &[DailySentimentPoint], bars: &[PriceBar]) -> Vec<AlignedRow> {
    let bars_by_date: HashMap<NaiveDate, &PriceBar> = bars.iter().map(|b| (b.date, b)).collect();

    let mut joined: Vec<(DailySentimentPoint, PriceBar)> = daily
        .iter()
        .filter_map(|p| bars_by_date.get(&p.date).map(|b| (*p, **b)))
        .collect();
    joined.sort_by_key(|(p, _)| p.date);

    let closes: Vec<f64> = joined.iter().map(|(_, b)| b.close).collect();
    let price_change = pct_change(&closes);

    // Missing sentiment reads as neutral before scaling; prices are never missing post-join.
    let sentiments: Vec<f64> = joined
        .iter()
        .map(|(p, _)| if p.daily_sentiment_score.is_nan() { 0.0 } else { p.daily_sentiment_score })
        .collect();
    let normalized_sentiment = min_max_normalize(&sentiments);
    let normalized_stock_price = min_max_normalize(&closes);

    let rows: Vec<AlignedRow> = joined
        .iter()
        .enumerate()
        .map(|(i, (p, b))| AlignedRow {
            date: p.date,
            daily_sentiment_score: p.daily_sentiment_score,
            close: b.close,
            volume: b.volume,
            price_change: price_change[i],
            normalized_sentiment: normalized_sentiment[i],
            normalized_stock_price: normalized_stock_price[i],
        })
        .collect();

    info!(
        "[ALIGN] {} sentiment days × {} price bars → {} aligned rows",
        daily.len(),
        bars.len(),
        rows.len()
    );
    rows
}

/// Percent change vs the previous element. First element is 0; a non-finite
/// result (zero prior close) is also 0.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        let change = if i == 0 {
            0.0
        } else {
            (v - values[i - 1]) / values[i - 1] * 100.0
        };
        out.push(if change.is_finite() { change } else { 0.0 });
    }
    out
}

/// Linear rescale so min → 0 and max → 100. Empty input gives empty output;
/// a constant series (including a single element) gives all zeros.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range == 0.0 {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|v| (v - min) / range * NORMALIZED_SCALE)
        .collect()
}
