use serde::Serialize;

use crate::model::{MatchLog, MatchResult};
use crate::numeric::round2;

/// Date-independent totals; undated matches count here like any other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub matches: usize,
    pub dated: usize,
    pub undated: usize,
    pub goals: u64,
    pub assists: u64,
    pub avg_goals: f64,
    pub avg_assists: f64,
    pub avg_performance: f64,
    pub avg_fatigue: f64,
    pub avg_mood: f64,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub unknown_results: usize,
    /// Wins over matches with a known result, in percent.
    pub win_pct: Option<f64>,
}

pub fn summarize(log: &MatchLog) -> Option<Summary> {
    let matches = log.matches();
    if matches.is_empty() {
        return None;
    }
    let n = matches.len();
    let mut goals = 0u64;
    let mut assists = 0u64;
    let mut performance = 0u64;
    let mut fatigue = 0u64;
    let mut mood = 0u64;
    let (mut wins, mut draws, mut losses, mut unknown) = (0, 0, 0, 0);
    for m in matches {
        goals += m.goals as u64;
        assists += m.assists as u64;
        performance += m.performance as u64;
        fatigue += m.fatigue as u64;
        mood += m.mood as u64;
        match m.result {
            MatchResult::Win => wins += 1,
            MatchResult::Draw => draws += 1,
            MatchResult::Loss => losses += 1,
            MatchResult::Unknown => unknown += 1,
        }
    }

    let avg = |total: u64| round2(total as f64 / n as f64);
    let decided = wins + draws + losses;
    let dated = log.dated_count();
    Some(Summary {
        matches: n,
        dated,
        undated: n - dated,
        goals,
        assists,
        avg_goals: avg(goals),
        avg_assists: avg(assists),
        avg_performance: avg(performance),
        avg_fatigue: avg(fatigue),
        avg_mood: avg(mood),
        wins,
        draws,
        losses,
        unknown_results: unknown,
        win_pct: (decided > 0).then(|| round2(wins as f64 * 100.0 / decided as f64)),
    })
}
