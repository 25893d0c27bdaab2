use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;

use crate::calendar::{month_label, weekday_label};
use crate::model::{Match, MatchLog, Metric};
use crate::numeric::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Count,
    Sum(Metric),
    /// Mean rounded to 2 decimals.
    Average(Metric),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Descending,
    Ascending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub label: String,
    pub value: f64,
    pub matches: usize,
}

/// Coarse bucket for 1-10 scale attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn of(value: u8) -> Self {
        match value {
            0..=3 => Tier::Low,
            4..=6 => Tier::Medium,
            _ => Tier::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Low => "Low",
            Tier::Medium => "Medium",
            Tier::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Weather,
    FatigueTier,
    MoodTier,
    PerformanceTier,
    Weekday,
    Month,
    Year,
    Venue,
    Jersey,
    VenueJersey,
    Result,
}

impl Grouping {
    pub fn label(self) -> &'static str {
        match self {
            Grouping::Weather => "Weather",
            Grouping::FatigueTier => "Fatigue",
            Grouping::MoodTier => "Mood",
            Grouping::PerformanceTier => "Performance",
            Grouping::Weekday => "Weekday",
            Grouping::Month => "Month",
            Grouping::Year => "Year",
            Grouping::Venue => "Venue",
            Grouping::Jersey => "Jersey",
            Grouping::VenueJersey => "Venue / Jersey",
            Grouping::Result => "Result",
        }
    }

    /// Group label for one match; `None` drops the match from this grouping
    /// (calendar groupings skip undated matches).
    pub fn key(self, log: &MatchLog, m: &Match) -> Option<String> {
        match self {
            Grouping::Weather => Some(m.weather.label().to_string()),
            Grouping::FatigueTier => Some(Tier::of(m.fatigue).label().to_string()),
            Grouping::MoodTier => Some(Tier::of(m.mood).label().to_string()),
            Grouping::PerformanceTier => Some(Tier::of(m.performance).label().to_string()),
            Grouping::Weekday => m.date().map(|d| weekday_label(d.weekday()).to_string()),
            Grouping::Month => m.date().map(|d| month_label(d.month()).to_string()),
            Grouping::Year => m.date().map(|d| d.year().to_string()),
            Grouping::Venue => Some(log.venue_name(m.venue_id).to_string()),
            Grouping::Jersey => Some(log.jersey_name(m.jersey_id).to_string()),
            Grouping::VenueJersey => Some(format!(
                "{} / {}",
                log.venue_name(m.venue_id),
                log.jersey_name(m.jersey_id)
            )),
            Grouping::Result => Some(m.result.label().to_string()),
        }
    }
}

pub fn aggregate(
    log: &MatchLog,
    grouping: Grouping,
    reduction: Reduction,
    order: SortOrder,
) -> Vec<GroupRow> {
    aggregate_by(log.matches(), |m| grouping.key(log, m), reduction, order)
}

/// Groups `matches` by `key` and reduces each group.
///
/// Groups are created in order of first appearance and sorted with a stable sort,
/// so groups with equal values keep the order of their earliest match.
pub fn aggregate_by<F>(
    matches: &[Match],
    key: F,
    reduction: Reduction,
    order: SortOrder,
) -> Vec<GroupRow>
where
    F: Fn(&Match) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, f64, usize)> = Vec::new();

    for m in matches {
        let Some(label) = key(m) else { continue };
        let slot = match index.get(&label) {
            Some(slot) => *slot,
            None => {
                index.insert(label.clone(), groups.len());
                groups.push((label, 0.0, 0));
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group.1 += match reduction {
            Reduction::Count => 0.0,
            Reduction::Sum(metric) | Reduction::Average(metric) => metric.value(m),
        };
        group.2 += 1;
    }

    let mut rows: Vec<GroupRow> = groups
        .into_iter()
        .map(|(label, total, n)| GroupRow {
            label,
            value: reduce(reduction, total, n),
            matches: n,
        })
        .collect();

    match order {
        SortOrder::Descending => rows.sort_by(|a, b| b.value.total_cmp(&a.value)),
        SortOrder::Ascending => rows.sort_by(|a, b| a.value.total_cmp(&b.value)),
    }
    rows
}

fn reduce(reduction: Reduction, total: f64, n: usize) -> f64 {
    match reduction {
        Reduction::Count => n as f64,
        Reduction::Sum(_) => total,
        Reduction::Average(_) => {
            if n == 0 {
                0.0
            } else {
                round2(total / n as f64)
            }
        }
    }
}

/// Best (or, with `Ascending`, lowest) group; `None` when the log has no matching rows.
pub fn top_one(
    log: &MatchLog,
    grouping: Grouping,
    reduction: Reduction,
    order: SortOrder,
) -> Option<GroupRow> {
    aggregate(log, grouping, reduction, order).into_iter().next()
}
