use chrono::NaiveDate;

use crate::config::MAX_RANGE_DAYS;
use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Run request
// ---------------------------------------------------------------------------

/// Validated input for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Free-text news query, usually the company name.
    pub company: String,
    pub symbol: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl RunRequest {
    pub fn new(company: &str, symbol: &str, from_date: NaiveDate, to_date: NaiveDate) -> Result<Self> {
        let company = company.trim();
        let symbol = symbol.trim().to_ascii_uppercase();
        if company.is_empty() {
            return Err(AppError::InvalidRequest("company must not be empty".to_string()));
        }
        if symbol.is_empty() {
            return Err(AppError::InvalidRequest("symbol must not be empty".to_string()));
        }
        if from_date > to_date {
            return Err(AppError::InvalidRequest(format!(
                "from date {from_date} is after to date {to_date}"
            )));
        }
        let span = (to_date - from_date).num_days();
        if span > MAX_RANGE_DAYS {
            return Err(AppError::InvalidRequest(format!(
                "date range spans {span} days; at most {MAX_RANGE_DAYS} are supported"
            )));
        }
        Ok(Self {
            company: company.to_string(),
            symbol,
            from_date,
            to_date,
        })
    }
}

// ---------------------------------------------------------------------------
// Headlines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineRecord {
    pub text: String,
    pub source_name: String,
    pub published_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHeadline {
    pub headline: HeadlineRecord,
    /// Compound polarity rescaled to [-100, 100].
    pub sentiment_score: f64,
    /// Rolling mean over the previous SMOOTHING_WINDOW scores; None until the window fills.
    pub smoothed_sentiment: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySentimentPoint {
    pub date: NaiveDate,
    pub daily_sentiment_score: f64,
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

// ---------------------------------------------------------------------------
// Aligned table
// ---------------------------------------------------------------------------

/// One trading day that has both headlines and a price bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub daily_sentiment_score: f64,
    pub close: f64,
    pub volume: u64,
    /// Percent change of `close` vs the previous aligned row; 0 on the first row.
    pub price_change: f64,
    pub normalized_sentiment: f64,
    pub normalized_stock_price: f64,
}

// ---------------------------------------------------------------------------
// Correlation classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    /// |r| < 0.10
    Weak,
    /// 0.10 <= |r| < 0.30
    Moderate,
    /// |r| >= 0.30
    Strong,
}

impl Strength {
    pub fn from_coefficient(coefficient: f64) -> Self {
        use crate::config::correlation_thresholds::*;
        let magnitude = coefficient.abs();
        if magnitude >= STRONG_MIN {
            Strength::Strong
        } else if magnitude >= MODERATE_MIN {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Strength::Weak => "weak",
            Strength::Moderate => "moderate",
            Strength::Strong => "strong",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Significance {
    Significant,
    NotSignificant,
}

impl Significance {
    pub fn from_p_value(p_value: f64) -> Self {
        use crate::config::correlation_thresholds::SIGNIFICANCE_LEVEL;
        if p_value < SIGNIFICANCE_LEVEL {
            Significance::Significant
        } else {
            Significance::NotSignificant
        }
    }
}

impl std::fmt::Display for Significance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Significance::Significant => write!(f, "statistically significant"),
            Significance::NotSignificant => write!(f, "not statistically significant"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationResult {
    pub coefficient: f64,
    pub p_value: f64,
    pub strength: Strength,
    pub significance: Significance,
    /// Number of aligned rows the coefficient was computed over.
    pub sample_size: usize,
}

impl CorrelationResult {
    pub fn statement(&self) -> String {
        format!(
            "The correlation between sentiment scores and stock prices is {}, and it is {}.",
            self.strength, self.significance
        )
    }
}

// ---------------------------------------------------------------------------
// Ingest bookkeeping
// ---------------------------------------------------------------------------

/// Per-stage row accounting. `malformed` rows were skipped with a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub total: usize,
    pub kept: usize,
    pub duplicates: usize,
    pub malformed: usize,
}
