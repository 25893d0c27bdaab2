use std::collections::HashMap;

use serde::Serialize;

use crate::aggregation::Grouping;
use crate::model::{Match, MatchLog, Metric};
use crate::numeric::round2;

/// `numerator / denominator` rounded to 2 decimals. A divisor that rounds to 0.00
/// makes the ratio undefined.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if round2(denominator) == 0.0 {
        return None;
    }
    let r = numerator / denominator;
    r.is_finite().then(|| round2(r))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Efficiency {
    pub numerator: Metric,
    pub denominator: Metric,
    pub numerator_avg: f64,
    pub denominator_avg: f64,
    pub ratio: Option<f64>,
    pub matches: usize,
}

/// Ratio of the two attribute averages; `None` for an empty set.
pub fn efficiency(matches: &[Match], numerator: Metric, denominator: Metric) -> Option<Efficiency> {
    efficiency_over(matches.iter(), numerator, denominator)
}

fn efficiency_over<'a, I>(matches: I, numerator: Metric, denominator: Metric) -> Option<Efficiency>
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut n = 0usize;
    let mut num_total = 0.0;
    let mut den_total = 0.0;
    for m in matches {
        n += 1;
        num_total += numerator.value(m);
        den_total += denominator.value(m);
    }
    if n == 0 {
        return None;
    }
    let num_avg = num_total / n as f64;
    let den_avg = den_total / n as f64;
    Some(Efficiency {
        numerator,
        denominator,
        numerator_avg: round2(num_avg),
        denominator_avg: round2(den_avg),
        ratio: ratio(num_avg, den_avg),
        matches: n,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEfficiency {
    pub label: String,
    pub efficiency: Efficiency,
}

/// Efficiency per group, highest ratio first; groups with an undefined ratio go last.
pub fn efficiency_by(
    log: &MatchLog,
    grouping: Grouping,
    numerator: Metric,
    denominator: Metric,
) -> Vec<GroupEfficiency> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&Match>)> = Vec::new();
    for m in log.matches() {
        let Some(label) = grouping.key(log, m) else { continue };
        let slot = match index.get(&label) {
            Some(slot) => *slot,
            None => {
                index.insert(label.clone(), groups.len());
                groups.push((label, Vec::new()));
                groups.len() - 1
            }
        };
        groups[slot].1.push(m);
    }

    let mut rows: Vec<GroupEfficiency> = groups
        .into_iter()
        .filter_map(|(label, members)| {
            efficiency_over(members, numerator, denominator)
                .map(|efficiency| GroupEfficiency { label, efficiency })
        })
        .collect();

    rows.sort_by(|a, b| match (a.efficiency.ratio, b.efficiency.ratio) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    rows
}
