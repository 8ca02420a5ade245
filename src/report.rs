use crate::pipeline::PipelineOutput;
use crate::types::{CorrelationResult, RunRequest};

/// `Correlation: <r>, P-value: <p>` followed by the classification sentence.
pub fn correlation_lines(result: &CorrelationResult) -> [String; 2] {
    [
        format!(
            "Correlation: {:.2}, P-value: {:.2}",
            result.coefficient, result.p_value
        ),
        result.statement(),
    ]
}

/// Full console report for one run. Correlation failure is reported inline;
/// the caller decides whether it is fatal.
pub fn render(req: &RunRequest, out: &PipelineOutput) -> String {
    let h = &out.headline_stats;
    let p = &out.price_stats;
    let mut lines = vec![
        format!("{} ({}) {} → {}", req.company, req.symbol, req.from_date, req.to_date),
        format!(
            "Headlines: {} fetched, {} unique, {} duplicate, {} skipped",
            h.total, h.kept, h.duplicates, h.malformed
        ),
        format!(
            "Price bars: {} fetched, {} kept, {} duplicate, {} skipped",
            p.total, p.kept, p.duplicates, p.malformed
        ),
        format!(
            "Aligned days: {} of {} sentiment days",
            out.aligned.len(),
            out.sentiment_days
        ),
    ];
    if let Some(smoothed) = out.latest_smoothed_sentiment {
        lines.push(format!("Latest smoothed headline sentiment: {smoothed:.2}"));
    }

    match &out.correlation {
        Ok(result) => lines.extend(correlation_lines(result)),
        Err(e) => lines.push(format!("Correlation unavailable: {e}")),
    }

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::types::{IngestStats, Significance, Strength};
    use chrono::NaiveDate;

    fn request() -> RunRequest {
        RunRequest::new(
            "Acme",
            "acme",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        )
        .unwrap()
    }

    fn output(correlation: crate::error::Result<CorrelationResult>) -> PipelineOutput {
        PipelineOutput {
            aligned: Vec::new(),
            correlation,
            headline_stats: IngestStats { total: 10, kept: 7, duplicates: 2, malformed: 1 },
            price_stats: IngestStats { total: 100, kept: 98, duplicates: 1, malformed: 1 },
            sentiment_days: 5,
            latest_smoothed_sentiment: Some(12.3456),
        }
    }

    #[test]
    fn correlation_line_format() {
        let r = CorrelationResult {
            coefficient: 0.3456,
            p_value: 0.0213,
            strength: Strength::Strong,
            significance: Significance::Significant,
            sample_size: 12,
        };
        let [first, second] = correlation_lines(&r);
        assert_eq!(first, "Correlation: 0.35, P-value: 0.02");
        assert!(second.contains("strong"));
        assert!(second.contains("statistically significant"));
    }

    #[test]
    fn report_includes_skip_counts_and_failure_reason() {
        let text = render(
            &request(),
            &output(Err(AppError::InsufficientData("need at least 2 aligned rows".to_string()))),
        );
        assert!(text.starts_with("Acme (ACME) 2024-03-01 → 2024-03-08"));
        assert!(text.contains("7 unique, 2 duplicate, 1 skipped"));
        assert!(text.contains("Price bars: 100 fetched, 98 kept, 1 duplicate, 1 skipped"));
        assert!(text.ends_with("Insufficient data: need at least 2 aligned rows\n"));
        assert!(text.contains("Latest smoothed headline sentiment: 12.35"));
        assert!(text.contains("Correlation unavailable: Insufficient data"));
    }
}
