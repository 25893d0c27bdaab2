use serde::Serialize;

use crate::model::Match;
use crate::numeric::{mean, percentile_sorted, round2};

/// Fence multiplier applied to the interquartile range.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// First and third quartile using linear interpolation.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let q1 = percentile_sorted(&sorted, 0.25)?;
    let q3 = percentile_sorted(&sorted, 0.75)?;
    Some((q1, q3))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierFence {
    pub mean: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub low: f64,
    pub high: f64,
}

/// Bounds sit at `mean ± 1.5·IQR`. The fence is anchored on the mean, not on Q1/Q3;
/// existing report output depends on this.
pub fn performance_fence(matches: &[Match]) -> Option<OutlierFence> {
    let values: Vec<f64> = matches.iter().map(|m| m.performance as f64).collect();
    fence_for(&values)
}

pub fn fence_for(values: &[f64]) -> Option<OutlierFence> {
    let mean = mean(values)?;
    let (q1, q3) = quartiles(values)?;
    let iqr = q3 - q1;
    Some(OutlierFence {
        mean,
        q1,
        q3,
        iqr,
        low: mean - IQR_MULTIPLIER * iqr,
        high: mean + IQR_MULTIPLIER * iqr,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierRow {
    pub id: u32,
    pub date: String,
    pub performance: u8,
    pub goals: u32,
    pub assists: u32,
}

impl From<&Match> for OutlierRow {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id,
            date: m.date.clone(),
            performance: m.performance,
            goals: m.goals,
            assists: m.assists,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub fence: OutlierFence,
    /// Strictly above the high bound, best performance first.
    pub high: Vec<OutlierRow>,
    /// Strictly below the low bound, worst performance first.
    pub low: Vec<OutlierRow>,
}

impl OutlierReport {
    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.low.is_empty()
    }

    /// Fence values rounded for display.
    pub fn display_bounds(&self) -> (f64, f64) {
        (round2(self.fence.low), round2(self.fence.high))
    }
}

/// `None` for an empty match set.
pub fn detect_outliers(matches: &[Match]) -> Option<OutlierReport> {
    let fence = performance_fence(matches)?;

    let mut high: Vec<&Match> = matches
        .iter()
        .filter(|m| m.performance as f64 > fence.high)
        .collect();
    high.sort_by(|a, b| b.performance.cmp(&a.performance).then(a.id.cmp(&b.id)));

    let mut low: Vec<&Match> = matches
        .iter()
        .filter(|m| (m.performance as f64) < fence.low)
        .collect();
    low.sort_by(|a, b| a.performance.cmp(&b.performance).then(a.id.cmp(&b.id)));

    Some(OutlierReport {
        fence,
        high: high.into_iter().map(OutlierRow::from).collect(),
        low: low.into_iter().map(OutlierRow::from).collect(),
    })
}
