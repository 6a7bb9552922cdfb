/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Linear-interpolated percentile (`p` in 0.0–1.0) of an ascending slice.
/// Returns 0.0 for empty input.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Median of an ascending slice. Returns 0.0 for empty input.
pub fn median(sorted: &[f64]) -> f64 {
    percentile(sorted, 0.5)
}

/// `part / total` as a percentage, 0.0 when `total` is zero.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Rounds to two decimals for report output.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Collects delays as ascending floats for the order statistics above.
pub fn sorted_delays(delays: impl Iterator<Item = i32>) -> Vec<f64> {
    let mut values: Vec<f64> = delays.map(f64::from).collect();
    values.sort_by(f64::total_cmp);
    values
}
