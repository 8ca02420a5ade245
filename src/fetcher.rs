use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::ingest::RawArticle;
use crate::types::RunRequest;

/// News-search response envelope. `message` is only set on errors.
#[derive(Debug, Deserialize)]
struct NewsResponse {
    status: Option<String>,
    message: Option<String>,
    articles: Option<Vec<RawArticle>>,
}

pub fn build_client(cfg: &Config) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(cfg.http_timeout).build()?)
}

/// Search headlines mentioning `req.company` between the request dates (inclusive),
/// most popular first, capped at the configured page size.
pub async fn fetch_headlines(
    client: &reqwest::Client,
    cfg: &Config,
    req: &RunRequest,
) -> Result<Vec<RawArticle>> {
    let url = format!("{}/v2/everything", cfg.news_api_url);
    let from = req.from_date.to_string();
    let to = req.to_date.to_string();
    let page_size = cfg.news_page_size.to_string();
    debug!(url = %url, query = %req.company, from = %from, to = %to, "[FETCH] news search");

    let resp = client
        .get(&url)
        .query(&[
            ("q", req.company.as_str()),
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("sortBy", "popularity"),
            ("pageSize", page_size.as_str()),
            ("language", "en"),
            ("apiKey", cfg.news_api_key.as_str()),
        ])
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;
    let parsed: Option<NewsResponse> = serde_json::from_str(&body).ok();

    if !status.is_success() {
        let detail = parsed
            .and_then(|p| p.message)
            .unwrap_or_else(|| truncate(&body, 200));
        return Err(AppError::upstream("news", format!("HTTP {status}: {detail}")));
    }

    let parsed = parsed.ok_or_else(|| {
        AppError::upstream("news", format!("response was not JSON: {}", truncate(&body, 200)))
    })?;
    if parsed.status.as_deref() == Some("error") {
        return Err(AppError::upstream(
            "news",
            parsed.message.unwrap_or_else(|| "provider reported an error".to_string()),
        ));
    }
    let articles = parsed
        .articles
        .ok_or_else(|| AppError::upstream("news", "response has no \"articles\" array"))?;

    info!("[FETCH] {} headlines for {:?} ({from}..{to})", articles.len(), req.company);
    Ok(articles)
}

/// Daily OHLCV for the trailing ~100 trading days. The payload is returned raw;
/// shape checks happen in `ingest::prices`.
pub async fn fetch_daily_prices(
    client: &reqwest::Client,
    cfg: &Config,
    symbol: &str,
) -> Result<serde_json::Value> {
    let url = format!("{}/query", cfg.market_api_url);
    debug!(url = %url, symbol, "[FETCH] daily prices");

    let resp = client
        .get(&url)
        .query(&[
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", "compact"),
            ("apikey", cfg.market_api_key.as_str()),
        ])
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AppError::upstream(
            "market",
            format!("HTTP {status}: {}", truncate(&body, 200)),
        ));
    }

    let body = resp.text().await?;
    let payload: serde_json::Value = serde_json::from_str(&body).map_err(|_| {
        AppError::upstream("market", format!("response was not JSON: {}", truncate(&body, 200)))
    })?;
    info!("[FETCH] daily price payload for {symbol}");
    Ok(payload)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub fn test_config(news_api_url: &str, market_api_url: &str) -> Config {
        Config {
            news_api_key: "news-key".to_string(),
            market_api_key: "market-key".to_string(),
            news_api_url: news_api_url.to_string(),
            market_api_url: market_api_url.to_string(),
            news_page_size: 100,
            http_timeout: Duration::from_secs(5),
            log_level: "debug".to_string(),
        }
    }

    pub fn test_request() -> RunRequest {
        RunRequest::new(
            "Acme",
            "ACME",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn headlines_sends_search_params_and_parses_articles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "Acme"))
            .and(query_param("from", "2024-03-01"))
            .and(query_param("to", "2024-03-15"))
            .and(query_param("sortBy", "popularity"))
            .and(query_param("pageSize", "100"))
            .and(query_param("language", "en"))
            .and(query_param("apiKey", "news-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "totalResults": 2,
                "articles": [
                    {"source": {"id": null, "name": "Reuters"}, "title": "Acme soars", "publishedAt": "2024-03-05T10:00:00Z"},
                    {"source": {"id": null, "name": "AP"}, "title": null, "publishedAt": "2024-03-06T10:00:00Z"}
                ]
            })))
            .mount(&server)
            .await;

        let cfg = test_config(&server.uri(), &server.uri());
        let client = build_client(&cfg).unwrap();
        let articles = fetch_headlines(&client, &cfg, &test_request()).await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("Acme soars"));
        assert!(articles[1].title.is_none());
    }

    #[tokio::test]
    async fn headlines_error_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": "error",
                "code": "apiKeyInvalid",
                "message": "Your API key is invalid or incorrect."
            })))
            .mount(&server)
            .await;

        let cfg = test_config(&server.uri(), &server.uri());
        let client = build_client(&cfg).unwrap();
        let err = fetch_headlines(&client, &cfg, &test_request()).await.unwrap_err();
        match err {
            AppError::UpstreamData { provider, message } => {
                assert_eq!(provider, "news");
                assert!(message.contains("401"));
                assert!(message.contains("API key is invalid"));
            }
            other => panic!("expected UpstreamData, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn headlines_missing_articles_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let cfg = test_config(&server.uri(), &server.uri());
        let client = build_client(&cfg).unwrap();
        assert!(matches!(
            fetch_headlines(&client, &cfg, &test_request()).await,
            Err(AppError::UpstreamData { .. })
        ));
    }

    #[tokio::test]
    async fn prices_sends_series_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "TIME_SERIES_DAILY"))
            .and(query_param("symbol", "ACME"))
            .and(query_param("outputsize", "compact"))
            .and(query_param("apikey", "market-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Time Series (Daily)": {
                    "2024-03-05": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "100.0", "5. volume": "10"}
                }
            })))
            .mount(&server)
            .await;

        let cfg = test_config(&server.uri(), &server.uri());
        let client = build_client(&cfg).unwrap();
        let payload = fetch_daily_prices(&client, &cfg, "ACME").await.unwrap();
        assert!(payload.get("Time Series (Daily)").is_some());
    }

    #[tokio::test]
    async fn prices_error_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let cfg = test_config(&server.uri(), &server.uri());
        let client = build_client(&cfg).unwrap();
        let err = fetch_daily_prices(&client, &cfg, "ACME").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamData { provider: "market", .. }));
    }

    #[tokio::test]
    async fn prices_html_body_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let cfg = test_config(&server.uri(), &server.uri());
        let client = build_client(&cfg).unwrap();
        match fetch_daily_prices(&client, &cfg, "ACME").await.unwrap_err() {
            AppError::UpstreamData { provider, message } => {
                assert_eq!(provider, "market");
                assert!(message.contains("not JSON"));
                assert!(message.contains("<html>maintenance</html>"));
            }
            other => panic!("expected UpstreamData, got {other:?}"),
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }
}
