use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::{DailySentimentPoint, ScoredHeadline};

/// Mean headline score per publish day. Days without headlines are absent.
///
/// Output happens to be date-ordered; callers that need ordering should still
/// sort, the aligner does.
pub fn aggregate_daily(scored: &[ScoredHeadline]) -> Vec<DailySentimentPoint> {
    let mut groups: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for s in scored {
        let entry = groups.entry(s.headline.published_date).or_insert((0.0, 0));
        entry.0 += s.sentiment_score;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(date, (sum, count))| DailySentimentPoint {
            date,
            daily_sentiment_score: sum / count as f64,
        })
        .collect()
}
