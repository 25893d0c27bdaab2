use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::{Connection, OpenFlags, params};

use crate::aggregation::GroupRow;
use crate::model::{JerseyVariant, Match, MatchLog, MatchResult, Metric, Venue, Weather};
use crate::numeric::round2;

pub fn open_read_only(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("open sqlite db {}", path.display()))
}

/// Creates the tables the loader expects. Used when preparing fixture databases.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS jerseys (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS venues (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NULL,
            jersey_id INTEGER NOT NULL REFERENCES jerseys(id),
            venue_id INTEGER NOT NULL REFERENCES venues(id),
            goals INTEGER NOT NULL DEFAULT 0,
            assists INTEGER NOT NULL DEFAULT 0,
            performance INTEGER NOT NULL,
            fatigue INTEGER NOT NULL,
            mood INTEGER NOT NULL,
            weather INTEGER NOT NULL,
            result INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_matches_venue ON matches(venue_id);
        CREATE INDEX IF NOT EXISTS idx_matches_jersey ON matches(jersey_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

struct RawMatch {
    id: i64,
    date: Option<String>,
    jersey_id: i64,
    venue_id: i64,
    goals: i64,
    assists: i64,
    performance: i64,
    fatigue: i64,
    mood: i64,
    weather: i64,
    result: i64,
}

/// Reads the whole log. Rows that cannot be represented (unknown weather code,
/// negative or oversized identifiers and counters) are skipped with a warning.
pub fn load_log(conn: &Connection) -> Result<MatchLog> {
    let jerseys = load_named(conn, "SELECT id, name FROM jerseys ORDER BY id")?
        .into_iter()
        .map(|(id, name)| JerseyVariant { id, name })
        .collect::<Vec<_>>();
    let venues = load_named(conn, "SELECT id, name FROM venues ORDER BY id")?
        .into_iter()
        .map(|(id, name)| Venue { id, name })
        .collect::<Vec<_>>();

    let mut stmt = conn
        .prepare(
            r#"
            SELECT id, date, jersey_id, venue_id, goals, assists,
                   performance, fatigue, mood, weather, result
            FROM matches
            ORDER BY id ASC
            "#,
        )
        .context("prepare load matches query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(RawMatch {
                id: row.get(0)?,
                date: row.get(1)?,
                jersey_id: row.get(2)?,
                venue_id: row.get(3)?,
                goals: row.get(4)?,
                assists: row.get(5)?,
                performance: row.get(6)?,
                fatigue: row.get(7)?,
                mood: row.get(8)?,
                weather: row.get(9)?,
                result: row.get(10)?,
            })
        })
        .context("query load matches")?;

    let mut matches = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        let raw = row.context("decode match row")?;
        match decode_match(&raw) {
            Some(m) => matches.push(m),
            None => {
                warn!("skipping match {}: values out of range", raw.id);
                skipped += 1;
            }
        }
    }
    info!(
        "loaded {} matches ({} skipped), {} jerseys, {} venues",
        matches.len(),
        skipped,
        jerseys.len(),
        venues.len()
    );
    Ok(MatchLog::new(matches, jerseys, venues))
}

fn load_named(conn: &Connection, sql: &str) -> Result<Vec<(u32, String)>> {
    let mut stmt = conn.prepare(sql).context("prepare lookup query")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))
        .context("query lookup table")?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name) = row.context("decode lookup row")?;
        match u32::try_from(id) {
            Ok(id) => out.push((id, name)),
            Err(_) => warn!("skipping lookup row {id} ({name}): id out of range"),
        }
    }
    Ok(out)
}

fn decode_match(raw: &RawMatch) -> Option<Match> {
    Some(Match {
        id: u32::try_from(raw.id).ok()?,
        date: raw.date.clone().unwrap_or_default(),
        jersey_id: u32::try_from(raw.jersey_id).ok()?,
        venue_id: u32::try_from(raw.venue_id).ok()?,
        goals: u32::try_from(raw.goals).ok()?,
        assists: u32::try_from(raw.assists).ok()?,
        performance: u8::try_from(raw.performance).ok()?,
        fatigue: u8::try_from(raw.fatigue).ok()?,
        mood: u8::try_from(raw.mood).ok()?,
        weather: Weather::from_code(raw.weather)?,
        result: MatchResult::from_code(raw.result),
    })
}

/// Columns the store can group on directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreGroup {
    Weather,
    Result,
    Venue,
    Jersey,
}

/// Delegated `GROUP BY` average of `metric`.
///
/// SQLite only sums and counts; rounding and ordering happen here with the same rules
/// as `aggregation::aggregate_by`, so both paths return identical rows.
pub fn grouped_average(conn: &Connection, group: StoreGroup, metric: Metric) -> Result<Vec<GroupRow>> {
    let value_expr = match metric {
        Metric::Goals => "m.goals",
        Metric::Assists => "m.assists",
        Metric::GoalContributions => "(m.goals + m.assists)",
        Metric::Performance => "m.performance",
        Metric::Fatigue => "m.fatigue",
        Metric::Mood => "m.mood",
    };
    let (key_expr, label_expr) = match group {
        StoreGroup::Weather => ("m.weather", "''"),
        StoreGroup::Result => ("CASE WHEN m.result IN (1, 2, 3) THEN m.result ELSE 0 END", "''"),
        StoreGroup::Venue => ("m.venue_id", "COALESCE(v.name, 'Unknown venue')"),
        StoreGroup::Jersey => ("m.jersey_id", "COALESCE(j.name, 'Unknown jersey')"),
    };
    // Same row filter the loader applies when decoding.
    let sql = format!(
        r#"
        SELECT {key_expr} AS grp,
               {label_expr} AS label,
               AVG({value_expr}) AS value,
               COUNT(*) AS n,
               MIN(m.id) AS first_id
        FROM matches m
        LEFT JOIN venues v ON v.id = m.venue_id
        LEFT JOIN jerseys j ON j.id = m.jersey_id
        WHERE m.weather BETWEEN 1 AND 6
          AND m.id BETWEEN 0 AND {u32_max}
          AND m.jersey_id BETWEEN 0 AND {u32_max}
          AND m.venue_id BETWEEN 0 AND {u32_max}
          AND m.goals BETWEEN 0 AND {u32_max}
          AND m.assists BETWEEN 0 AND {u32_max}
          AND m.performance BETWEEN 0 AND 255
          AND m.fatigue BETWEEN 0 AND 255
          AND m.mood BETWEEN 0 AND 255
        GROUP BY grp
        "#,
        u32_max = u32::MAX
    );

    let mut stmt = conn.prepare(&sql).context("prepare grouped query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })
        .context("query grouped average")?;

    let mut ranked: Vec<(i64, GroupRow)> = Vec::new();
    for row in rows {
        let (key, label, value, n, first_id) = row.context("decode grouped row")?;
        let label = match group {
            StoreGroup::Weather => match Weather::from_code(key) {
                Some(w) => w.label().to_string(),
                None => continue,
            },
            StoreGroup::Result => MatchResult::from_code(key).label().to_string(),
            StoreGroup::Venue | StoreGroup::Jersey => label,
        };
        ranked.push((
            first_id,
            GroupRow {
                label,
                value: round2(value),
                matches: usize::try_from(n).unwrap_or_default(),
            },
        ));
    }

    // First-appearance order, then a stable sort on the value.
    ranked.sort_by_key(|(first_id, _)| *first_id);
    let mut out: Vec<GroupRow> = ranked.into_iter().map(|(_, row)| row).collect();
    out.sort_by(|a, b| b.value.total_cmp(&a.value));
    Ok(out)
}

/// Number of stored matches, including rows the loader would skip.
pub fn count_matches(conn: &Connection) -> Result<usize> {
    let n = conn
        .query_row("SELECT COUNT(*) FROM matches", params![], |row| row.get::<_, i64>(0))
        .context("count matches")?;
    Ok(usize::try_from(n).unwrap_or_default())
}
