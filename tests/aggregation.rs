use matchlog::aggregation::{Grouping, Reduction, SortOrder, aggregate, aggregate_by, top_one};
use matchlog::model::{JerseyVariant, Match, MatchLog, MatchResult, Metric, Venue, Weather};

fn match_row(id: u32, date: &str) -> Match {
    Match {
        id,
        date: date.to_string(),
        jersey_id: 1,
        venue_id: 1,
        goals: 0,
        assists: 0,
        performance: 5,
        fatigue: 5,
        mood: 5,
        weather: Weather::Clear,
        result: MatchResult::Draw,
    }
}

fn sample_log() -> MatchLog {
    let mut rows = Vec::new();
    let specs: [(u32, &str, u32, u8, u8, Weather, u32, u32); 8] = [
        (1, "01/05/2023", 2, 7, 3, Weather::Clear, 1, 1),
        (2, "08/05/2023", 0, 4, 8, Weather::Rain, 1, 2),
        (3, "", 1, 6, 5, Weather::Rain, 2, 1),
        (4, "20/06/2023", 3, 9, 2, Weather::Hot, 2, 2),
        (5, "21/06/2023", 1, 5, 6, Weather::Clear, 3, 1),
        (6, "bad-date", 0, 3, 9, Weather::Cold, 3, 2),
        (7, "02/01/2024", 2, 8, 4, Weather::Clear, 1, 1),
        (8, "09/01/2024", 1, 6, 7, Weather::Windy, 2, 2),
    ];
    for (id, date, goals, perf, fatigue, weather, venue, jersey) in specs {
        let mut m = match_row(id, date);
        m.goals = goals;
        m.performance = perf;
        m.fatigue = fatigue;
        m.weather = weather;
        m.venue_id = venue;
        m.jersey_id = jersey;
        rows.push(m);
    }
    MatchLog::new(
        rows,
        vec![
            JerseyVariant { id: 1, name: "Red".to_string() },
            JerseyVariant { id: 2, name: "Green".to_string() },
        ],
        vec![
            Venue { id: 1, name: "North".to_string() },
            Venue { id: 2, name: "South".to_string() },
            Venue { id: 3, name: "Hall".to_string() },
        ],
    )
}

#[test]
fn group_averages_reconstruct_overall_total() {
    let log = sample_log();
    let total: f64 = log.matches().iter().map(|m| m.performance as f64).sum();

    for grouping in [
        Grouping::Weather,
        Grouping::FatigueTier,
        Grouping::MoodTier,
        Grouping::Venue,
        Grouping::Jersey,
        Grouping::VenueJersey,
        Grouping::Result,
    ] {
        let rows = aggregate(
            &log,
            grouping,
            Reduction::Average(Metric::Performance),
            SortOrder::Descending,
        );
        let rebuilt: f64 = rows.iter().map(|r| r.value * r.matches as f64).sum();
        let tolerance = 0.005 * log.len() as f64;
        assert!(
            (rebuilt - total).abs() <= tolerance,
            "{grouping:?}: rebuilt {rebuilt} vs {total}"
        );
        assert_eq!(rows.iter().map(|r| r.matches).sum::<usize>(), log.len());
    }
}

#[test]
fn calendar_groupings_skip_undated_matches() {
    let log = sample_log();
    for grouping in [Grouping::Weekday, Grouping::Month, Grouping::Year] {
        let rows = aggregate(&log, grouping, Reduction::Count, SortOrder::Descending);
        assert_eq!(rows.iter().map(|r| r.matches).sum::<usize>(), 6, "{grouping:?}");
    }

    let years = aggregate(&log, Grouping::Year, Reduction::Sum(Metric::Goals), SortOrder::Descending);
    assert_eq!(years.len(), 2);
    assert_eq!(years[0].label, "2023");
    assert_eq!(years[0].value, 6.0);
    assert_eq!(years[1].label, "2024");
    assert_eq!(years[1].value, 3.0);
}

#[test]
fn rows_sorted_by_value_in_requested_order() {
    let log = sample_log();
    let desc = aggregate(
        &log,
        Grouping::Weather,
        Reduction::Average(Metric::Performance),
        SortOrder::Descending,
    );
    assert!(desc.windows(2).all(|w| w[0].value >= w[1].value));
    assert_eq!(desc[0].label, "Hot");
    // Clear: 7, 5, 8 -> 6.67
    let clear = desc.iter().find(|r| r.label == "Clear").unwrap();
    assert_eq!(clear.value, 6.67);
    assert_eq!(clear.matches, 3);

    let asc = aggregate(
        &log,
        Grouping::Weather,
        Reduction::Average(Metric::Performance),
        SortOrder::Ascending,
    );
    assert!(asc.windows(2).all(|w| w[0].value <= w[1].value));
    assert_eq!(asc[0].label, "Cold");
}

#[test]
fn equal_values_keep_first_appearance_order() {
    let mut rows = Vec::new();
    for (id, weather) in [(1, Weather::Windy), (2, Weather::Rain), (3, Weather::Hot)] {
        let mut m = match_row(id, "01/01/2024");
        m.weather = weather;
        rows.push(m);
    }
    let log = MatchLog::new(rows, Vec::new(), Vec::new());
    let out = aggregate(&log, Grouping::Weather, Reduction::Count, SortOrder::Descending);
    let labels: Vec<&str> = out.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Windy", "Rain", "Hot"]);

    let out = aggregate(&log, Grouping::Weather, Reduction::Count, SortOrder::Ascending);
    let labels: Vec<&str> = out.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Windy", "Rain", "Hot"]);
}

#[test]
fn top_one_picks_best_or_least() {
    let log = sample_log();
    let best = top_one(
        &log,
        Grouping::Venue,
        Reduction::Average(Metric::Goals),
        SortOrder::Descending,
    )
    .expect("non-empty log has a best venue");
    // North: 2, 0, 2 -> 1.33; South: 1, 3, 1 -> 1.67; Hall: 1, 0 -> 0.5
    assert_eq!(best.label, "South");
    assert_eq!(best.value, 1.67);

    let least_tired = top_one(
        &log,
        Grouping::Venue,
        Reduction::Average(Metric::Fatigue),
        SortOrder::Ascending,
    )
    .unwrap();
    // North: 3, 8, 4 -> 5; South: 5, 2, 7 -> 4.67; Hall: 6, 9 -> 7.5
    assert_eq!(least_tired.label, "South");
    assert_eq!(least_tired.value, 4.67);
}

#[test]
fn empty_log_yields_no_rows() {
    let log = MatchLog::default();
    assert!(aggregate(&log, Grouping::Weather, Reduction::Count, SortOrder::Descending).is_empty());
    assert!(
        top_one(&log, Grouping::Venue, Reduction::Average(Metric::Goals), SortOrder::Descending)
            .is_none()
    );
}

#[test]
fn venue_jersey_pairs_use_lookup_names() {
    let log = sample_log();
    let rows = aggregate(&log, Grouping::VenueJersey, Reduction::Count, SortOrder::Descending);
    assert!(rows.iter().any(|r| r.label == "North / Red"));
    assert!(rows.iter().all(|r| r.label.contains(" / ")));
}

#[test]
fn aggregate_by_accepts_custom_keys() {
    let log = sample_log();
    let rows = aggregate_by(
        log.matches(),
        |m| Some(if m.scored() { "Scored" } else { "Blank" }.to_string()),
        Reduction::Count,
        SortOrder::Descending,
    );
    assert_eq!(rows[0].label, "Scored");
    assert_eq!(rows[0].value, 6.0);
    assert_eq!(rows[1].value, 2.0);
}
