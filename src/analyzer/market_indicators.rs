use crate::model::TrendScore;

/// Number of most recent daily data points averaged into a trend score.
pub const TREND_WINDOW: usize = 7;

/// Mean of the last [`TREND_WINDOW`] ratios, rounded half away from zero and
/// clamped to 0..=100. Returns 0 when there is nothing to average.
pub fn recent_trend_score(ratios: &[f64]) -> TrendScore {
    let start = ratios.len().saturating_sub(TREND_WINDOW);
    let window: Vec<f64> = ratios[start..].iter().copied().filter(|r| r.is_finite()).collect();
    if window.is_empty() {
        return 0;
    }

    let mean = window.iter().sum::<f64>() / window.len() as f64;
    mean.round().clamp(0.0, 100.0) as TrendScore
}

/// Integer mean truncated toward zero. `None` for an empty slice.
pub fn truncated_mean(prices: &[i64]) -> Option<i64> {
    if prices.is_empty() {
        return None;
    }
    let sum: i128 = prices.iter().map(|&p| i128::from(p)).sum();
    i64::try_from(sum / prices.len() as i128).ok()
}

pub fn lowest(prices: &[i64]) -> Option<i64> {
    prices.iter().copied().min()
}
