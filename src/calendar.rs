use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::model::{Match, Metric};
use crate::numeric::round2;

/// Display order for weekday buckets.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// Proleptic Gregorian weekday for any representable year; `None` for impossible dates.
pub fn weekday_from_parts(day: u32, month: u32, year: i32) -> Option<Weekday> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.weekday())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayBucket {
    pub label: &'static str,
    pub average: f64,
    pub matches: usize,
}

/// Always seven buckets, Sunday first. Undated matches are skipped; empty days average 0.
pub fn weekday_buckets(matches: &[Match], metric: Metric) -> Vec<WeekdayBucket> {
    let mut sums = [0.0_f64; 7];
    let mut counts = [0usize; 7];
    for m in matches {
        let Some(date) = m.date() else { continue };
        let idx = date.weekday().num_days_from_sunday() as usize;
        sums[idx] += metric.value(m);
        counts[idx] += 1;
    }

    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(idx, day)| WeekdayBucket {
            label: weekday_label(*day),
            average: if counts[idx] == 0 {
                0.0
            } else {
                round2(sums[idx] / counts[idx] as f64)
            },
            matches: counts[idx],
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub total: f64,
    pub average: f64,
    pub matches: usize,
}

impl MonthBucket {
    pub fn label(&self) -> String {
        format!("{} {}", month_label(self.month), self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearBucket {
    pub year: i32,
    pub total: f64,
    pub average: f64,
    pub matches: usize,
}

/// Months that contain at least one dated match, oldest first.
pub fn monthly_buckets(matches: &[Match], metric: Metric) -> Vec<MonthBucket> {
    let mut acc: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for m in matches {
        let Some(date) = m.date() else { continue };
        let entry = acc.entry((date.year(), date.month())).or_insert((0.0, 0));
        entry.0 += metric.value(m);
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|((year, month), (total, n))| MonthBucket {
            year,
            month,
            total,
            average: round2(total / n as f64),
            matches: n,
        })
        .collect()
}

pub fn yearly_buckets(matches: &[Match], metric: Metric) -> Vec<YearBucket> {
    let mut acc: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for m in matches {
        let Some(date) = m.date() else { continue };
        let entry = acc.entry(date.year()).or_insert((0.0, 0));
        entry.0 += metric.value(m);
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(year, (total, n))| YearBucket {
            year,
            total,
            average: round2(total / n as f64),
            matches: n,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearGroup {
    pub year: i32,
    pub months: Vec<MonthBucket>,
}

/// Folds month rows (already in chronological order) into one group per year.
/// A new group starts whenever the year changes between adjacent rows.
pub fn group_months_by_year(rows: Vec<MonthBucket>) -> Vec<YearGroup> {
    rows.into_iter().fold(Vec::new(), |mut groups: Vec<YearGroup>, row| {
        match groups.last_mut() {
            Some(group) if group.year == row.year => group.months.push(row),
            _ => groups.push(YearGroup {
                year: row.year,
                months: vec![row],
            }),
        }
        groups
    })
}
