use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::types::{HeadlineRecord, IngestStats};

/// Article shape returned by the news-search provider.
/// Fields are optional because the provider nulls them freely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    pub title: Option<String>,
    pub source: Option<RawSource>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    pub name: Option<String>,
}

/// Why a raw article could not become a `HeadlineRecord`.
#[derive(Debug, PartialEq, Eq)]
enum Malformed {
    MissingText,
    MissingDate,
    BadDate(String),
}

impl std::fmt::Display for Malformed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Malformed::MissingText => write!(f, "missing title"),
            Malformed::MissingDate => write!(f, "missing publishedAt"),
            Malformed::BadDate(raw) => write!(f, "unparseable publishedAt {raw:?}"),
        }
    }
}

/// Truncate each timestamp to its calendar day and drop repeated headline text,
/// keeping the first occurrence in input order. Malformed articles are skipped.
pub fn dedup_and_date(articles: &[RawArticle]) -> (Vec<HeadlineRecord>, IngestStats) {
    let mut stats = IngestStats {
        total: articles.len(),
        ..IngestStats::default()
    };
    let mut seen: HashSet<&str> = HashSet::with_capacity(articles.len());
    let mut records = Vec::with_capacity(articles.len());

    for (idx, article) in articles.iter().enumerate() {
        let (text, published_date) = match parse_article(article) {
            Ok(parsed) => parsed,
            Err(reason) => {
                warn!(index = idx, "[INGEST] skipping headline: {reason}");
                stats.malformed += 1;
                continue;
            }
        };

        if !seen.insert(text) {
            stats.duplicates += 1;
            continue;
        }

        let source_name = article
            .source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("unknown")
            .to_string();

        records.push(HeadlineRecord {
            text: text.to_string(),
            source_name,
            published_date,
        });
    }

    stats.kept = records.len();
    info!(
        "[INGEST] headlines: {} raw → {} unique ({} duplicates, {} malformed)",
        stats.total, stats.kept, stats.duplicates, stats.malformed
    );
    (records, stats)
}

fn parse_article(article: &RawArticle) -> Result<(&str, NaiveDate), Malformed> {
    let text = article
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or(Malformed::MissingText)?;
    let raw = article.published_at.as_deref().ok_or(Malformed::MissingDate)?;
    Ok((text, parse_calendar_day(raw).ok_or_else(|| Malformed::BadDate(raw.to_string()))?))
}

/// `2024-03-05T14:02:11Z` → 2024-03-05. Anything after the first ten characters is ignored.
pub fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
