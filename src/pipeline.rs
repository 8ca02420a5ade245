use tracing::{debug, info};

use crate::analysis::{align_and_scale, analyze};
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{build_client, fetch_daily_prices, fetch_headlines};
use crate::ingest::{dedup_and_date, normalize_price_series, RawArticle};
use crate::scorer::{aggregate_daily, PolarityModel, SentimentScorer};
use crate::types::{AlignedRow, CorrelationResult, IngestStats, RunRequest};

/// Everything one run produces.
///
/// `correlation` is kept separate from the table: an `InsufficientData` failure
/// there leaves `aligned` valid for charting.
#[derive(Debug)]
pub struct PipelineOutput {
    pub aligned: Vec<AlignedRow>,
    pub correlation: Result<CorrelationResult>,
    pub headline_stats: IngestStats,
    pub price_stats: IngestStats,
    pub sentiment_days: usize,
    /// Last full-window rolling mean over scored headlines, if any.
    pub latest_smoothed_sentiment: Option<f64>,
}

/// Fetch both sources concurrently, then run every stage on the joined result.
/// Either fetch failing aborts the run before any scoring.
pub async fn run<M: PolarityModel>(
    cfg: &Config,
    req: &RunRequest,
    scorer: &SentimentScorer<M>,
) -> Result<PipelineOutput> {
    let client = build_client(cfg)?;
    let (articles, payload) = tokio::try_join!(
        fetch_headlines(&client, cfg, req),
        fetch_daily_prices(&client, cfg, &req.symbol),
    )?;
    process(&articles, &payload, scorer)
}

/// Synchronous part of the pipeline: dedup → score → aggregate ⇒ join prices ⇒ analyze.
pub fn process<M: PolarityModel>(
    articles: &[RawArticle],
    price_payload: &serde_json::Value,
    scorer: &SentimentScorer<M>,
) -> Result<PipelineOutput> {
    let (bars, price_stats) = normalize_price_series(price_payload)?;
    let (headlines, headline_stats) = dedup_and_date(articles);

    let scored = scorer.score_headlines(headlines);
    let latest_smoothed_sentiment = scored.iter().rev().find_map(|s| s.smoothed_sentiment);
    if let Some(v) = latest_smoothed_sentiment {
        debug!("[SCORE] latest smoothed sentiment {v:.2}");
    }
    let daily = aggregate_daily(&scored);
    info!("[SCORE] {} headlines over {} days", scored.len(), daily.len());

    let aligned = align_and_scale(&daily, &bars);
    let correlation = analyze(&aligned);

    Ok(PipelineOutput {
        aligned,
        correlation,
        headline_stats,
        price_stats,
        sentiment_days: daily.len(),
        latest_smoothed_sentiment,
    })
}
