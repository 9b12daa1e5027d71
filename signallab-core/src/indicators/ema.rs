//! Exponential moving average.

/// Span-parameterized EMA seeded at the first value.
///
/// alpha = 2 / (span + 1); out[0] = values[0];
/// out[i] = alpha * values[i] + (1 - alpha) * out[i - 1].
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    assert!(span > 0, "span must be positive");
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(&v) => v,
        None => return out,
    };
    out.push(prev);
    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}
