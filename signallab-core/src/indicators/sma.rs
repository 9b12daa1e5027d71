//! Rolling means, in both edge policies.

/// Rolling mean with partial windows: index `i` averages the last
/// `min(i + 1, window)` values. Output length equals input length and is
/// never NaN for finite input.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window > 0, "window must be positive");
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        let count = (i + 1).min(window);
        out.push(sum / count as f64);
    }
    out
}

/// Strict rolling mean: index `i` is NaN until a full window is available,
/// and NaN whenever any value inside the window is NaN.
pub fn rolling_mean_strict(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window > 0, "window must be positive");
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i + 1 < window {
            out.push(f64::NAN);
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            out.push(f64::NAN);
        } else {
            out.push(slice.iter().sum::<f64>() / window as f64);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn partial_windows_average_what_exists() {
        let out = rolling_mean(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(out.len(), 4);
        assert_approx(out[0], 10.0, DEFAULT_EPSILON);
        assert_approx(out[1], 15.0, DEFAULT_EPSILON);
        assert_approx(out[2], 20.0, DEFAULT_EPSILON);
        assert_approx(out[3], 30.0, DEFAULT_EPSILON);
    }

    #[test]
    fn window_one_is_identity() {
        let values = [5.0, 7.0, 9.0];
        let out = rolling_mean(&values, 1);
        assert_eq!(out, values.to_vec());
    }

    #[test]
    fn strict_mean_is_nan_until_full_window() {
        let out = rolling_mean_strict(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_approx(out[2], 2.0, DEFAULT_EPSILON);
        assert_approx(out[3], 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn strict_mean_propagates_nan_inside_window() {
        let out = rolling_mean_strict(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert_approx(out[3], 3.5, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(rolling_mean(&[], 5).is_empty());
        assert!(rolling_mean_strict(&[], 5).is_empty());
    }
}
