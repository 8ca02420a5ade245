use std::collections::VecDeque;

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::config::{SENTIMENT_SCALE, SMOOTHING_WINDOW};
use crate::types::{HeadlineRecord, ScoredHeadline};

/// Lexicon-based polarity: text → compound score in [-1, 1].
pub trait PolarityModel {
    fn compound(&self, text: &str) -> f64;
}

/// VADER lexicon model. Built once and reused for every headline.
pub struct VaderModel {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderModel {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityModel for VaderModel {
    fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let scores = self.analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0)
    }
}

pub struct SentimentScorer<M: PolarityModel> {
    model: M,
}

impl<M: PolarityModel> SentimentScorer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Signed sentiment magnitude in [-100, 100].
    pub fn score(&self, text: &str) -> f64 {
        (self.model.compound(text) * SENTIMENT_SCALE).clamp(-SENTIMENT_SCALE, SENTIMENT_SCALE)
    }

    /// Score every headline, one-to-one and in input order, and attach the
    /// rolling smoothed score.
    pub fn score_headlines(&self, headlines: Vec<HeadlineRecord>) -> Vec<ScoredHeadline> {
        let scores: Vec<f64> = headlines.iter().map(|h| self.score(&h.text)).collect();
        let smoothed = rolling_mean(&scores, SMOOTHING_WINDOW);

        headlines
            .into_iter()
            .zip(scores)
            .zip(smoothed)
            .map(|((headline, sentiment_score), smoothed_sentiment)| ScoredHeadline {
                headline,
                sentiment_score,
                smoothed_sentiment,
            })
            .collect()
    }
}

/// Trailing mean over `window` values. Positions before the window fills are None.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let mut buf: VecDeque<f64> = VecDeque::with_capacity(window);
    let mut sum = 0.0;
    values
        .iter()
        .map(|&v| {
            buf.push_back(v);
            sum += v;
            if buf.len() > window {
                sum -= buf.pop_front().unwrap_or(0.0);
            }
            (buf.len() == window).then(|| sum / window as f64)
        })
        .collect()
}
