//! Pure statistics over a target's latency history.

use std::collections::VecDeque;

/// Minimum, mean and maximum of the recorded samples, or `None` when the
/// history is empty.
pub fn min_mean_max(history: &VecDeque<f64>) -> Option<(f64, f64, f64)> {
    if history.is_empty() {
        return None;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &v in history {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
        sum += v;
    }

    Some((min, sum / history.len() as f64, max))
}

/// Mean absolute difference between temporally consecutive samples.
///
/// Needs at least two samples. Order matters: the input reflects
/// successive-sample variability, not a sorted distribution.
pub fn jitter(history: &VecDeque<f64>) -> Option<f64> {
    if history.len() < 2 {
        return None;
    }

    let total: f64 = history
        .iter()
        .zip(history.iter().skip(1))
        .map(|(a, b)| (b - a).abs())
        .sum();

    Some(total / (history.len() - 1) as f64)
}
