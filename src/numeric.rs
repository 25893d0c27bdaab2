/// Scales by `10^places` and rounds the scaled value half away from zero.
///
/// Works on the binary value after scaling, so `3.0 / 40.0` lands on `0.08`.
/// Every rounded figure in reports goes through here.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Continuous percentile with linear interpolation between closest ranks,
/// evaluated at position `(n - 1) * p` of the sorted sample.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * p;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
