use std::time::Duration;

use crate::error::{AppError, Result};

pub const NEWS_API_URL: &str = "https://newsapi.org";
pub const MARKET_API_URL: &str = "https://www.alphavantage.co";

/// Upper bound the news provider accepts for `pageSize`.
pub const MAX_NEWS_PAGE_SIZE: u32 = 100;

/// Longest request window (inclusive days between from and to).
/// The free news tier only searches roughly one month back.
pub const MAX_RANGE_DAYS: i64 = 31;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Rolling window over scored headlines for the smoothed sentiment column.
pub const SMOOTHING_WINDOW: usize = 3;

/// Upper end of the min-max normalization range.
pub const NORMALIZED_SCALE: f64 = 100.0;

/// Compound polarity in [-1, 1] is rescaled by this factor.
pub const SENTIMENT_SCALE: f64 = 100.0;

/// Correlation strength thresholds on |r|.
pub mod correlation_thresholds {
    pub const STRONG_MIN: f64 = 0.30;
    pub const MODERATE_MIN: f64 = 0.10;
    /// Two-sided p-value below this is reported as significant.
    pub const SIGNIFICANCE_LEVEL: f64 = 0.05;
}

#[derive(Debug, Clone)]
pub struct Config {
    pub news_api_key: String,
    pub market_api_key: String,
    pub news_api_url: String,
    pub market_api_url: String,
    /// Headlines requested per search (NEWS_PAGE_SIZE, 1..=100)
    pub news_page_size: u32,
    pub http_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let news_page_size = std::env::var("NEWS_PAGE_SIZE")
            .unwrap_or_else(|_| MAX_NEWS_PAGE_SIZE.to_string())
            .parse::<u32>()
            .map_err(|_| AppError::Config("NEWS_PAGE_SIZE must be a positive integer".to_string()))?;
        if news_page_size == 0 || news_page_size > MAX_NEWS_PAGE_SIZE {
            return Err(AppError::Config(format!(
                "NEWS_PAGE_SIZE must be between 1 and {MAX_NEWS_PAGE_SIZE}"
            )));
        }

        let timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .ok()
            .filter(|&secs| secs > 0)
            .ok_or_else(|| {
                AppError::Config("HTTP_TIMEOUT_SECS must be a positive integer".to_string())
            })?;

        Ok(Self {
            news_api_key: required("NEWS_API_KEY")?,
            market_api_key: required("MARKET_API_KEY")?,
            news_api_url: std::env::var("NEWS_API_URL")
                .unwrap_or_else(|_| NEWS_API_URL.to_string()),
            market_api_url: std::env::var("MARKET_API_URL")
                .unwrap_or_else(|_| MARKET_API_URL.to_string()),
            news_page_size,
            http_timeout: Duration::from_secs(timeout_secs),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::Config(format!("{name} must be set"))),
    }
}
