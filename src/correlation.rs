use serde::Serialize;

use crate::model::{Match, Metric};
use crate::numeric::round_to;

/// Pearson product-moment coefficient from raw sums, rounded to 4 decimals.
///
/// `None` when the samples differ in length, hold fewer than two points, or either
/// side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    let var_x = n * sum_x2 - sum_x * sum_x;
    let var_y = n * sum_y2 - sum_y * sum_y;
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    let r = (n * sum_xy - sum_x * sum_y) / (var_x * var_y).sqrt();
    r.is_finite().then(|| round_to(r.clamp(-1.0, 1.0), 4))
}

pub fn correlate(matches: &[Match], x: Metric, y: Metric) -> Option<f64> {
    let xs: Vec<f64> = matches.iter().map(|m| x.value(m)).collect();
    let ys: Vec<f64> = matches.iter().map(|m| y.value(m)).collect();
    pearson(&xs, &ys)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    Negligible,
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    pub fn of(r: f64) -> Self {
        let a = r.abs();
        if a < 0.1 {
            Strength::Negligible
        } else if a < 0.3 {
            Strength::Weak
        } else if a < 0.5 {
            Strength::Moderate
        } else {
            Strength::Strong
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strength::Negligible => "negligible",
            Strength::Weak => "weak",
            Strength::Moderate => "moderate",
            Strength::Strong => "strong",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRow {
    pub x: Metric,
    pub y: Metric,
    pub r: Option<f64>,
    pub strength: Option<Strength>,
}

/// One row per unordered metric pair, in the order the pairs appear in `metrics`.
pub fn correlation_matrix(matches: &[Match], metrics: &[Metric]) -> Vec<CorrelationRow> {
    let mut rows = Vec::new();
    for (i, x) in metrics.iter().enumerate() {
        for y in &metrics[i + 1..] {
            let r = correlate(matches, *x, *y);
            rows.push(CorrelationRow {
                x: *x,
                y: *y,
                r,
                strength: r.map(Strength::of),
            });
        }
    }
    rows
}
