use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_JERSEY: &str = "Unknown jersey";
pub const UNKNOWN_VENUE: &str = "Unknown venue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Cloudy,
    Rain,
    Windy,
    Hot,
    Cold,
}

impl Weather {
    pub const ALL: [Weather; 6] = [
        Weather::Clear,
        Weather::Cloudy,
        Weather::Rain,
        Weather::Windy,
        Weather::Hot,
        Weather::Cold,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Weather::Clear),
            2 => Some(Weather::Cloudy),
            3 => Some(Weather::Rain),
            4 => Some(Weather::Windy),
            5 => Some(Weather::Hot),
            6 => Some(Weather::Cold),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Weather::Clear => 1,
            Weather::Cloudy => 2,
            Weather::Rain => 3,
            Weather::Windy => 4,
            Weather::Hot => 5,
            Weather::Cold => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Cloudy => "Cloudy",
            Weather::Rain => "Rain",
            Weather::Windy => "Windy",
            Weather::Hot => "Hot",
            Weather::Cold => "Cold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
    Unknown,
}

impl MatchResult {
    /// Codes outside 1..=3 are kept as `Unknown` rather than rejected.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => MatchResult::Win,
            2 => MatchResult::Draw,
            3 => MatchResult::Loss,
            _ => MatchResult::Unknown,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            MatchResult::Win => 1,
            MatchResult::Draw => 2,
            MatchResult::Loss => 3,
            MatchResult::Unknown => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchResult::Win => "Win",
            MatchResult::Draw => "Draw",
            MatchResult::Loss => "Loss",
            MatchResult::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JerseyVariant {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: u32,
    /// Raw date text as logged; may be empty or malformed.
    pub date: String,
    pub jersey_id: u32,
    pub venue_id: u32,
    pub goals: u32,
    pub assists: u32,
    pub performance: u8,
    pub fatigue: u8,
    pub mood: u8,
    pub weather: Weather,
    pub result: MatchResult,
}

impl Match {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_match_date(&self.date)
    }

    pub fn scored(&self) -> bool {
        self.goals > 0
    }
}

/// Accepts `DD/MM/YYYY` (also with `-` or `.` separators, single-digit parts allowed)
/// and ISO `YYYY-MM-DD`. Impossible calendar dates yield `None`.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let parts: Vec<&str> = s.split(['/', '-', '.']).map(str::trim).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    if a.is_empty() || b.is_empty() || c.is_empty() {
        return None;
    }
    let (day, month, year) = if a.len() == 4 {
        (c.parse::<u32>().ok()?, b.parse::<u32>().ok()?, a.parse::<i32>().ok()?)
    } else if c.len() == 4 {
        (a.parse::<u32>().ok()?, b.parse::<u32>().ok()?, c.parse::<i32>().ok()?)
    } else {
        return None;
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Numeric match attributes the analytics operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Goals,
    Assists,
    GoalContributions,
    Performance,
    Fatigue,
    Mood,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Goals,
        Metric::Assists,
        Metric::GoalContributions,
        Metric::Performance,
        Metric::Fatigue,
        Metric::Mood,
    ];

    pub fn value(self, m: &Match) -> f64 {
        match self {
            Metric::Goals => m.goals as f64,
            Metric::Assists => m.assists as f64,
            Metric::GoalContributions => m.goals as f64 + m.assists as f64,
            Metric::Performance => m.performance as f64,
            Metric::Fatigue => m.fatigue as f64,
            Metric::Mood => m.mood as f64,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Goals => "Goals",
            Metric::Assists => "Assists",
            Metric::GoalContributions => "Goal contributions",
            Metric::Performance => "Performance",
            Metric::Fatigue => "Fatigue",
            Metric::Mood => "Mood",
        }
    }
}

/// Immutable snapshot of the match log taken at report time.
#[derive(Debug, Clone, Default)]
pub struct MatchLog {
    matches: Vec<Match>,
    jerseys: HashMap<u32, JerseyVariant>,
    venues: HashMap<u32, Venue>,
}

impl MatchLog {
    pub fn new(mut matches: Vec<Match>, jerseys: Vec<JerseyVariant>, venues: Vec<Venue>) -> Self {
        matches.sort_by_key(|m| m.id);
        Self {
            matches,
            jerseys: jerseys.into_iter().map(|j| (j.id, j)).collect(),
            venues: venues.into_iter().map(|v| (v.id, v)).collect(),
        }
    }

    /// Matches ordered by identifier.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn jersey_name(&self, id: u32) -> &str {
        self.jerseys
            .get(&id)
            .map(|j| j.name.as_str())
            .unwrap_or(UNKNOWN_JERSEY)
    }

    pub fn venue_name(&self, id: u32) -> &str {
        self.venues
            .get(&id)
            .map(|v| v.name.as_str())
            .unwrap_or(UNKNOWN_VENUE)
    }

    pub fn dated_count(&self) -> usize {
        self.matches.iter().filter(|m| m.date().is_some()).count()
    }
}
