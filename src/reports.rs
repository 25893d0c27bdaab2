use std::fmt;

use chrono::{Datelike, NaiveDate};
use log::debug;
use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::aggregation::{GroupRow, Grouping, Reduction, SortOrder, aggregate, top_one};
use crate::calendar::{group_months_by_year, month_label, monthly_buckets, weekday_buckets, yearly_buckets};
use crate::correlation::correlation_matrix;
use crate::efficiency::{efficiency, efficiency_by};
use crate::model::{MatchLog, Metric};
use crate::outliers::detect_outliers;
use crate::streaks::{StreakKind, longest_streak};
use crate::summary::summarize;

pub const NO_DATA: &str = "no data";

/// One value handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Real { value: f64, places: usize },
    NoData,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn int(n: impl TryInto<i64>) -> Self {
        n.try_into().map(Cell::Int).unwrap_or(Cell::NoData)
    }

    pub fn real2(value: f64) -> Self {
        Cell::real(value, 2)
    }

    pub fn real(value: f64, places: usize) -> Self {
        if value.is_finite() {
            Cell::Real { value, places }
        } else {
            Cell::NoData
        }
    }

    pub fn opt_real2(value: Option<f64>) -> Self {
        value.map(Cell::real2).unwrap_or(Cell::NoData)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(n) => write!(f, "{n}"),
            Cell::Real { value, places } => write!(f, "{value:.places$}"),
            Cell::NoData => f.write_str(NO_DATA),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Int(n) => serializer.serialize_i64(*n),
            Cell::Real { .. } => match self.to_string().parse::<f64>() {
                Ok(v) => serializer.serialize_f64(v),
                Err(_) => serializer.serialize_none(),
            },
            Cell::NoData => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Summary,
    Results,
    Weather,
    Fatigue,
    Mood,
    Weekday,
    Monthly,
    Yearly,
    VenueJersey,
    BestVenue,
    LeastFatigueVenue,
    VenueEfficiency,
    Correlations,
    Outliers,
    Streaks,
    Efficiency,
}

impl ReportKind {
    pub const ALL: [ReportKind; 16] = [
        ReportKind::Summary,
        ReportKind::Results,
        ReportKind::Weather,
        ReportKind::Fatigue,
        ReportKind::Mood,
        ReportKind::Weekday,
        ReportKind::Monthly,
        ReportKind::Yearly,
        ReportKind::VenueJersey,
        ReportKind::BestVenue,
        ReportKind::LeastFatigueVenue,
        ReportKind::VenueEfficiency,
        ReportKind::Correlations,
        ReportKind::Outliers,
        ReportKind::Streaks,
        ReportKind::Efficiency,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::Results => "results",
            ReportKind::Weather => "weather",
            ReportKind::Fatigue => "fatigue",
            ReportKind::Mood => "mood",
            ReportKind::Weekday => "weekday",
            ReportKind::Monthly => "monthly",
            ReportKind::Yearly => "yearly",
            ReportKind::VenueJersey => "venue-jersey",
            ReportKind::BestVenue => "best-venue",
            ReportKind::LeastFatigueVenue => "least-fatigue-venue",
            ReportKind::VenueEfficiency => "venue-efficiency",
            ReportKind::Correlations => "correlations",
            ReportKind::Outliers => "outliers",
            ReportKind::Streaks => "streaks",
            ReportKind::Efficiency => "efficiency",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.slug() == needle)
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Summary => "Overall summary",
            ReportKind::Results => "Results breakdown",
            ReportKind::Weather => "Performance by weather",
            ReportKind::Fatigue => "Performance by fatigue level",
            ReportKind::Mood => "Performance by mood",
            ReportKind::Weekday => "Performance by weekday",
            ReportKind::Monthly => "Monthly goals",
            ReportKind::Yearly => "Yearly overview",
            ReportKind::VenueJersey => "Venue and jersey combinations",
            ReportKind::BestVenue => "Most productive venue",
            ReportKind::LeastFatigueVenue => "Least tiring venue",
            ReportKind::VenueEfficiency => "Efficiency by venue",
            ReportKind::Correlations => "Attribute correlations",
            ReportKind::Outliers => "Performance outliers",
            ReportKind::Streaks => "Longest streaks",
            ReportKind::Efficiency => "Efficiency ratios",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Report {
    fn new(kind: ReportKind, columns: &[&str]) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows rendered to text, exactly as every output format shows them.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }
}

pub fn build_report(log: &MatchLog, kind: ReportKind) -> Report {
    let report = match kind {
        ReportKind::Summary => summary_report(log),
        ReportKind::Results => group_report(
            kind,
            &["Result", "Matches"],
            aggregate(log, Grouping::Result, Reduction::Count, SortOrder::Descending),
            ValueShape::Count,
        ),
        ReportKind::Weather => performance_by(log, kind, Grouping::Weather),
        ReportKind::Fatigue => performance_by(log, kind, Grouping::FatigueTier),
        ReportKind::Mood => performance_by(log, kind, Grouping::MoodTier),
        ReportKind::Weekday => weekday_report(log),
        ReportKind::Monthly => monthly_report(log),
        ReportKind::Yearly => yearly_report(log),
        ReportKind::VenueJersey => performance_by(log, kind, Grouping::VenueJersey),
        ReportKind::BestVenue => group_report(
            kind,
            &["Venue", "Avg goals", "Matches"],
            top_one(
                log,
                Grouping::Venue,
                Reduction::Average(Metric::Goals),
                SortOrder::Descending,
            )
            .into_iter()
            .collect(),
            ValueShape::Average,
        ),
        ReportKind::LeastFatigueVenue => group_report(
            kind,
            &["Venue", "Avg fatigue", "Matches"],
            top_one(
                log,
                Grouping::Venue,
                Reduction::Average(Metric::Fatigue),
                SortOrder::Ascending,
            )
            .into_iter()
            .collect(),
            ValueShape::Average,
        ),
        ReportKind::VenueEfficiency => venue_efficiency_report(log),
        ReportKind::Correlations => correlations_report(log),
        ReportKind::Outliers => outliers_report(log),
        ReportKind::Streaks => streaks_report(log),
        ReportKind::Efficiency => efficiency_report(log),
    };
    debug!("built report {} ({} rows)", kind.slug(), report.rows.len());
    report
}

/// Every report in catalogue order. Reports only read the snapshot, so they are
/// built in parallel.
pub fn build_all_reports(log: &MatchLog) -> Vec<Report> {
    ReportKind::ALL
        .par_iter()
        .map(|kind| build_report(log, *kind))
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum ValueShape {
    Count,
    Average,
}

fn group_report(
    kind: ReportKind,
    columns: &[&str],
    rows: Vec<GroupRow>,
    shape: ValueShape,
) -> Report {
    let mut report = Report::new(kind, columns);
    for row in rows {
        report.rows.push(match shape {
            ValueShape::Count => vec![Cell::text(row.label), Cell::int(row.matches)],
            ValueShape::Average => vec![
                Cell::text(row.label),
                Cell::real2(row.value),
                Cell::int(row.matches),
            ],
        });
    }
    report
}

fn performance_by(log: &MatchLog, kind: ReportKind, grouping: Grouping) -> Report {
    let rows = aggregate(
        log,
        grouping,
        Reduction::Average(Metric::Performance),
        SortOrder::Descending,
    );
    group_report(
        kind,
        &[grouping.label(), "Avg performance", "Matches"],
        rows,
        ValueShape::Average,
    )
}

fn summary_report(log: &MatchLog) -> Report {
    let mut report = Report::new(ReportKind::Summary, &["Metric", "Value"]);
    let Some(s) = summarize(log) else {
        return report;
    };
    let mut push = |label: &str, cell: Cell| report.rows.push(vec![Cell::text(label), cell]);
    push("Matches", Cell::int(s.matches));
    push("Dated matches", Cell::int(s.dated));
    push("Undated matches", Cell::int(s.undated));
    push("Goals", Cell::int(s.goals));
    push("Assists", Cell::int(s.assists));
    push("Avg goals", Cell::real2(s.avg_goals));
    push("Avg assists", Cell::real2(s.avg_assists));
    push("Avg performance", Cell::real2(s.avg_performance));
    push("Avg fatigue", Cell::real2(s.avg_fatigue));
    push("Avg mood", Cell::real2(s.avg_mood));
    push("Wins", Cell::int(s.wins));
    push("Draws", Cell::int(s.draws));
    push("Losses", Cell::int(s.losses));
    push("Unknown results", Cell::int(s.unknown_results));
    push("Win %", Cell::opt_real2(s.win_pct));
    report
}

fn weekday_report(log: &MatchLog) -> Report {
    let mut report = Report::new(ReportKind::Weekday, &["Weekday", "Avg performance", "Matches"]);
    if log.is_empty() {
        return report;
    }
    for bucket in weekday_buckets(log.matches(), Metric::Performance) {
        report.rows.push(vec![
            Cell::text(bucket.label),
            Cell::real2(bucket.average),
            Cell::int(bucket.matches),
        ]);
    }
    report
}

fn monthly_report(log: &MatchLog) -> Report {
    let mut report = Report::new(
        ReportKind::Monthly,
        &["Year", "Month", "Goals", "Avg performance", "Matches"],
    );
    let goals = monthly_buckets(log.matches(), Metric::Goals);
    let performance = monthly_buckets(log.matches(), Metric::Performance);
    for group in group_months_by_year(goals) {
        for (idx, month) in group.months.iter().enumerate() {
            let avg_perf = performance
                .iter()
                .find(|p| p.year == month.year && p.month == month.month)
                .map(|p| p.average);
            report.rows.push(vec![
                if idx == 0 {
                    Cell::text(group.year.to_string())
                } else {
                    Cell::text("")
                },
                Cell::text(month_label(month.month)),
                Cell::int(month.total as i64),
                Cell::opt_real2(avg_perf),
                Cell::int(month.matches),
            ]);
        }
    }
    report
}

fn yearly_report(log: &MatchLog) -> Report {
    let mut report = Report::new(
        ReportKind::Yearly,
        &["Year", "Matches", "Goals", "Avg goals", "Avg performance"],
    );
    let goals = yearly_buckets(log.matches(), Metric::Goals);
    let performance = yearly_buckets(log.matches(), Metric::Performance);
    for (g, p) in goals.iter().zip(&performance) {
        report.rows.push(vec![
            Cell::text(g.year.to_string()),
            Cell::int(g.matches),
            Cell::int(g.total as i64),
            Cell::real2(g.average),
            Cell::real2(p.average),
        ]);
    }
    report
}

fn venue_efficiency_report(log: &MatchLog) -> Report {
    let mut report = Report::new(
        ReportKind::VenueEfficiency,
        &["Venue", "Avg performance", "Avg fatigue", "Performance per fatigue", "Matches"],
    );
    for row in efficiency_by(log, Grouping::Venue, Metric::Performance, Metric::Fatigue) {
        let e = row.efficiency;
        report.rows.push(vec![
            Cell::text(row.label),
            Cell::real2(e.numerator_avg),
            Cell::real2(e.denominator_avg),
            Cell::opt_real2(e.ratio),
            Cell::int(e.matches),
        ]);
    }
    report
}

fn correlations_report(log: &MatchLog) -> Report {
    let mut report = Report::new(
        ReportKind::Correlations,
        &["Attribute X", "Attribute Y", "r", "Strength"],
    );
    if log.len() < 2 {
        return report;
    }
    let metrics = [
        Metric::Goals,
        Metric::Assists,
        Metric::Performance,
        Metric::Fatigue,
        Metric::Mood,
    ];
    for row in correlation_matrix(log.matches(), &metrics) {
        report.rows.push(vec![
            Cell::text(row.x.label()),
            Cell::text(row.y.label()),
            row.r.map(|r| Cell::real(r, 4)).unwrap_or(Cell::NoData),
            row.strength
                .map(|s| Cell::text(s.label()))
                .unwrap_or(Cell::NoData),
        ]);
    }
    report
}

fn outliers_report(log: &MatchLog) -> Report {
    let mut report = Report::new(
        ReportKind::Outliers,
        &["Kind", "Match", "Date", "Performance", "Goals", "Assists"],
    );
    let Some(found) = detect_outliers(log.matches()) else {
        return report;
    };
    let (low, high) = found.display_bounds();
    report.notes.push(format!(
        "Bounds: below {low:.2} or above {high:.2} (mean {:.2} ± 1.5 × IQR {:.2})",
        found.fence.mean, found.fence.iqr
    ));
    for (kind, rows) in [("High", &found.high), ("Low", &found.low)] {
        for row in rows {
            report.rows.push(vec![
                Cell::text(kind),
                Cell::int(row.id),
                Cell::text(row.date.clone()),
                Cell::int(row.performance),
                Cell::int(row.goals),
                Cell::int(row.assists),
            ]);
        }
    }
    report
}

fn streaks_report(log: &MatchLog) -> Report {
    let mut report = Report::new(
        ReportKind::Streaks,
        &["Streak", "Length", "From match", "To match", "From", "To"],
    );
    if log.dated_count() == 0 {
        return report;
    }
    for kind in StreakKind::ALL {
        let row = match longest_streak(log.matches(), |m| kind.holds(m)) {
            Some(s) => vec![
                Cell::text(kind.label()),
                Cell::int(s.length),
                Cell::int(s.start_id),
                Cell::int(s.end_id),
                date_cell(s.start_date),
                date_cell(s.end_date),
            ],
            None => vec![
                Cell::text(kind.label()),
                Cell::NoData,
                Cell::NoData,
                Cell::NoData,
                Cell::NoData,
                Cell::NoData,
            ],
        };
        report.rows.push(row);
    }
    report
}

fn efficiency_report(log: &MatchLog) -> Report {
    let mut report = Report::new(
        ReportKind::Efficiency,
        &["Ratio", "Numerator avg", "Denominator avg", "Value"],
    );
    let pairs = [
        (Metric::Performance, Metric::Fatigue),
        (Metric::Mood, Metric::Fatigue),
        (Metric::GoalContributions, Metric::Performance),
        (Metric::Goals, Metric::Fatigue),
    ];
    for (num, den) in pairs {
        let Some(e) = efficiency(log.matches(), num, den) else {
            continue;
        };
        report.rows.push(vec![
            Cell::text(format!("{} per {}", num.label(), den.label().to_lowercase())),
            Cell::real2(e.numerator_avg),
            Cell::real2(e.denominator_avg),
            Cell::opt_real2(e.ratio),
        ]);
    }
    report
}

fn date_cell(date: Option<NaiveDate>) -> Cell {
    match date {
        Some(d) => Cell::text(format!("{:02}/{:02}/{}", d.day(), d.month(), d.year())),
        None => Cell::NoData,
    }
}
