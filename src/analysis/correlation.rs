use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::types::{AlignedRow, CorrelationResult, Significance, Strength};

/// Pearson correlation of raw daily sentiment against price change over the
/// aligned table. Display-scaled columns are not used.
pub fn analyze(rows: &[AlignedRow]) -> Result<CorrelationResult> {
    let sentiment: Vec<f64> = rows.iter().map(|r| r.daily_sentiment_score).collect();
    let price_change: Vec<f64> = rows.iter().map(|r| r.price_change).collect();
    analyze_series(&sentiment, &price_change)
}

/// Coefficient, two-sided p-value and classification for two paired series.
///
/// Fails with `InsufficientData` on fewer than two pairs or when either series
/// has no variance, rather than reporting a meaningless coefficient.
pub fn analyze_series(x: &[f64], y: &[f64]) -> Result<CorrelationResult> {
    if x.len() != y.len() {
        return Err(AppError::InsufficientData(format!(
            "series lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(AppError::InsufficientData(format!(
            "need at least 2 aligned rows for correlation, got {n}"
        )));
    }
    if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
        return Err(AppError::InsufficientData("series contain non-finite values".to_string()));
    }
    if is_constant(x) {
        return Err(AppError::InsufficientData("sentiment series has zero variance".to_string()));
    }
    if is_constant(y) {
        return Err(AppError::InsufficientData("price change series has zero variance".to_string()));
    }

    let coefficient = pearson(x, y)?;
    let p_value = two_sided_p_value(coefficient, n)?;
    debug!(n, coefficient, p_value, "[CORRELATION] computed");

    Ok(CorrelationResult {
        coefficient,
        p_value,
        strength: Strength::from_coefficient(coefficient),
        significance: Significance::from_p_value(p_value),
        sample_size: n,
    })
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Caller guarantees equal lengths ≥ 2. Variance that underflows to zero or
/// overflows to infinity is treated like a constant series.
fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 || !var_x.is_finite() || !var_y.is_finite() {
        return Err(AppError::InsufficientData(
            "series variance is outside floating-point range".to_string(),
        ));
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if !r.is_finite() {
        return Err(AppError::InsufficientData(format!("correlation is not finite ({r})")));
    }
    Ok(r.clamp(-1.0, 1.0))
}

/// p-value for H0: no linear relationship, via t = r·sqrt((n-2)/(1-r²)).
/// Two points always fit a line exactly, so n == 2 carries no evidence (p = 1).
fn two_sided_p_value(r: f64, n: usize) -> Result<f64> {
    if n == 2 {
        return Ok(1.0);
    }
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return Ok(0.0);
    }
    let t = r * (df / denom).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AppError::InsufficientData(format!("t distribution with df={df}: {e}")))?;
    Ok((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}
