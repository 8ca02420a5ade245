use serde_json::Value;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::ingest::headlines::parse_calendar_day;
use crate::types::{IngestStats, PriceBar};

/// Key holding the date → OHLCV map in a daily time-series response.
pub const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

/// Keys the market-data provider uses to explain why no series came back
/// (bad symbol, rate limit, premium endpoint).
const PROVIDER_MESSAGE_KEYS: &[&str] = &["Error Message", "Note", "Information"];

/// Turn a daily time-series payload into price bars sorted ascending by date.
///
/// Only close and volume are retained. A payload without the series key is an
/// upstream error, never an empty series. Individual rows that fail to parse are
/// skipped and counted.
pub fn normalize_price_series(payload: &Value) -> Result<(Vec<PriceBar>, IngestStats)> {
    let series = match payload.get(DAILY_SERIES_KEY).and_then(|s| s.as_object()) {
        Some(s) => s,
        None => return Err(AppError::upstream("market", provider_message(payload))),
    };

    let mut stats = IngestStats {
        total: series.len(),
        ..IngestStats::default()
    };
    let mut bars = Vec::with_capacity(series.len());

    for (raw_date, fields) in series {
        match parse_bar(raw_date, fields) {
            Some(bar) => bars.push(bar),
            None => {
                warn!(date = %raw_date, "[INGEST] skipping malformed price row: {fields}");
                stats.malformed += 1;
            }
        }
    }

    bars.sort_by_key(|b| b.date);
    let before = bars.len();
    // "2024-03-05" and "2024-03-05 16:00:00" collapse to the same day; keep the first.
    bars.dedup_by_key(|b| b.date);
    stats.duplicates = before - bars.len();
    stats.kept = bars.len();

    info!(
        "[INGEST] prices: {} rows → {} bars ({} duplicates, {} malformed)",
        stats.total, stats.kept, stats.duplicates, stats.malformed
    );
    Ok((bars, stats))
}

fn parse_bar(raw_date: &str, fields: &Value) -> Option<PriceBar> {
    let date = parse_calendar_day(raw_date)?;
    let close = field(fields, &["4. close", "close"]).and_then(as_f64)?;
    if !close.is_finite() || close < 0.0 {
        return None;
    }
    let volume = field(fields, &["5. volume", "volume"]).and_then(as_u64)?;
    Some(PriceBar { date, close, volume })
}

fn field<'a>(fields: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| fields.get(*k))
}

fn as_f64(v: &Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn as_u64(v: &Value) -> Option<u64> {
    v.as_u64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn provider_message(payload: &Value) -> String {
    PROVIDER_MESSAGE_KEYS
        .iter()
        .find_map(|k| payload.get(*k).and_then(|m| m.as_str()))
        .map(|m| m.to_string())
        .unwrap_or_else(|| {
            let raw = payload.to_string();
            let short: String = raw.chars().take(200).collect();
            format!("unexpected response, missing {DAILY_SERIES_KEY:?}: {short}")
        })
}
