use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Match, MatchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreakKind {
    Scoring,
    Goalless,
    Assisting,
    Winning,
    Unbeaten,
    Winless,
    Losing,
}

impl StreakKind {
    pub const ALL: [StreakKind; 7] = [
        StreakKind::Scoring,
        StreakKind::Goalless,
        StreakKind::Assisting,
        StreakKind::Winning,
        StreakKind::Unbeaten,
        StreakKind::Winless,
        StreakKind::Losing,
    ];

    pub fn holds(self, m: &Match) -> bool {
        match self {
            StreakKind::Scoring => m.goals >= 1,
            StreakKind::Goalless => m.goals == 0,
            StreakKind::Assisting => m.assists >= 1,
            StreakKind::Winning => m.result == MatchResult::Win,
            StreakKind::Unbeaten => matches!(m.result, MatchResult::Win | MatchResult::Draw),
            StreakKind::Winless => matches!(m.result, MatchResult::Draw | MatchResult::Loss),
            StreakKind::Losing => m.result == MatchResult::Loss,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StreakKind::Scoring => "Scored in consecutive matches",
            StreakKind::Goalless => "Consecutive matches without scoring",
            StreakKind::Assisting => "Assisted in consecutive matches",
            StreakKind::Winning => "Consecutive wins",
            StreakKind::Unbeaten => "Unbeaten run",
            StreakKind::Winless => "Winless run",
            StreakKind::Losing => "Consecutive losses",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub length: usize,
    pub start_id: u32,
    pub end_id: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Left-to-right reducer over chronologically ordered matches.
///
/// The best run only moves on a strict improvement, so among equally long runs the
/// earliest one wins.
#[derive(Debug, Clone, Default)]
pub struct StreakTracker {
    current_len: usize,
    current_start: Option<(u32, Option<NaiveDate>)>,
    best: Option<Streak>,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, m: &Match, holds: bool) {
        if !holds {
            self.current_len = 0;
            self.current_start = None;
            return;
        }
        if self.current_len == 0 {
            self.current_start = Some((m.id, m.date()));
        }
        self.current_len += 1;

        let best_len = self.best.as_ref().map(|s| s.length).unwrap_or(0);
        if self.current_len > best_len {
            let (start_id, start_date) = self.current_start.unwrap_or((m.id, m.date()));
            self.best = Some(Streak {
                length: self.current_len,
                start_id,
                end_id: m.id,
                start_date,
                end_date: m.date(),
            });
        }
    }

    pub fn current_len(&self) -> usize {
        self.current_len
    }

    pub fn best(&self) -> Option<&Streak> {
        self.best.as_ref()
    }

    pub fn finish(self) -> Option<Streak> {
        self.best
    }
}

/// Dated matches ordered by date, then identifier. Undated matches have no place in
/// the sequence and are left out.
pub fn chronological(matches: &[Match]) -> Vec<&Match> {
    let mut dated: Vec<(NaiveDate, &Match)> = matches
        .iter()
        .filter_map(|m| m.date().map(|d| (d, m)))
        .collect();
    dated.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
    dated.into_iter().map(|(_, m)| m).collect()
}

/// Longest run over the chronological order; `None` when no match satisfies `predicate`.
pub fn longest_streak<P>(matches: &[Match], predicate: P) -> Option<Streak>
where
    P: Fn(&Match) -> bool,
{
    longest_in_sequence(chronological(matches), predicate)
}

/// Same fold, over a sequence the caller has already ordered.
pub fn longest_in_sequence<'a, I, P>(ordered: I, predicate: P) -> Option<Streak>
where
    I: IntoIterator<Item = &'a Match>,
    P: Fn(&Match) -> bool,
{
    ordered
        .into_iter()
        .fold(StreakTracker::new(), |mut tracker, m| {
            tracker.push(m, predicate(m));
            tracker
        })
        .finish()
}

/// The run that ends on the most recent match, if that match satisfies `predicate`.
pub fn current_streak<P>(matches: &[Match], predicate: P) -> Option<Streak>
where
    P: Fn(&Match) -> bool,
{
    let ordered = chronological(matches);
    let last = *ordered.last()?;
    if !predicate(last) {
        return None;
    }
    let run: Vec<&Match> = ordered
        .iter()
        .rev()
        .take_while(|m| predicate(**m))
        .copied()
        .collect();
    let first = *run.last()?;
    Some(Streak {
        length: run.len(),
        start_id: first.id,
        end_id: last.id,
        start_date: first.date(),
        end_date: last.date(),
    })
}
