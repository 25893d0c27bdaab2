use chrono::Weekday;

use matchlog::calendar::{
    group_months_by_year, monthly_buckets, weekday_buckets, weekday_from_parts, yearly_buckets,
};
use matchlog::model::{Match, MatchResult, Metric, Weather};

fn match_row(id: u32, date: &str, performance: u8, goals: u32) -> Match {
    Match {
        id,
        date: date.to_string(),
        jersey_id: 1,
        venue_id: 1,
        goals,
        assists: 0,
        performance,
        fatigue: 5,
        mood: 5,
        weather: Weather::Cloudy,
        result: MatchResult::Win,
    }
}

#[test]
fn weekday_matches_gregorian_calendar_across_centuries() {
    let cases = [
        (1, 1, 1900, Weekday::Mon),
        (29, 2, 2000, Weekday::Tue),
        (1, 3, 1600, Weekday::Wed),
        (1, 3, 2100, Weekday::Mon),
        (14, 9, 1752, Weekday::Thu),
        (31, 12, 2399, Weekday::Fri),
        (7, 3, 2024, Weekday::Thu),
    ];
    for (day, month, year, want) in cases {
        assert_eq!(weekday_from_parts(day, month, year), Some(want), "{day}/{month}/{year}");
    }
    assert_eq!(weekday_from_parts(29, 2, 1900), None);
    assert_eq!(weekday_from_parts(0, 1, 2024), None);
}

#[test]
fn always_seven_buckets_sunday_first() {
    let buckets = weekday_buckets(&[], Metric::Performance);
    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets[0].label, "Sunday");
    assert_eq!(buckets[6].label, "Saturday");
    assert!(buckets.iter().all(|b| b.matches == 0 && b.average == 0.0));
}

#[test]
fn weekday_buckets_average_and_count() {
    let matches = vec![
        match_row(1, "03/03/2024", 8, 0), // Sunday
        match_row(2, "10/03/2024", 7, 0), // Sunday
        match_row(3, "07/03/2024", 6, 0), // Thursday
        match_row(4, "", 10, 0),
        match_row(5, "99/99/2024", 1, 0),
        match_row(6, "09/03/2024", 4, 0), // Saturday
    ];
    let buckets = weekday_buckets(&matches, Metric::Performance);
    assert_eq!(buckets.len(), 7);

    let sunday = &buckets[0];
    assert_eq!((sunday.average, sunday.matches), (7.5, 2));
    let thursday = &buckets[4];
    assert_eq!(thursday.label, "Thursday");
    assert_eq!((thursday.average, thursday.matches), (6.0, 1));
    assert_eq!(buckets[6].matches, 1);
    assert_eq!(buckets[1].average, 0.0);

    let dated = matches.iter().filter(|m| m.date().is_some()).count();
    assert_eq!(buckets.iter().map(|b| b.matches).sum::<usize>(), dated);
}

#[test]
fn months_fold_into_year_groups() {
    let matches = vec![
        match_row(1, "15/11/2023", 6, 1),
        match_row(2, "20/12/2023", 7, 2),
        match_row(3, "21/12/2023", 5, 0),
        match_row(4, "05/01/2024", 8, 3),
        match_row(5, "", 9, 4),
        match_row(6, "12/03/2024", 4, 1),
    ];
    let months = monthly_buckets(&matches, Metric::Goals);
    assert_eq!(months.len(), 4);
    assert_eq!(months[1].label(), "December 2023");
    assert_eq!(months[1].total, 2.0);
    assert_eq!(months[1].matches, 2);
    assert_eq!(months[1].average, 1.0);

    let groups = group_months_by_year(months);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].year, 2023);
    assert_eq!(groups[0].months.len(), 2);
    assert_eq!(groups[1].year, 2024);
    assert_eq!(
        groups[1].months.iter().map(|m| m.month).collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[test]
fn yearly_buckets_skip_undated() {
    let matches = vec![
        match_row(1, "15/11/2023", 6, 1),
        match_row(2, "05/01/2024", 8, 3),
        match_row(3, "", 9, 4),
        match_row(4, "2024-02-10", 7, 0),
    ];
    let years = yearly_buckets(&matches, Metric::Performance);
    assert_eq!(years.len(), 2);
    assert_eq!((years[0].year, years[0].matches), (2023, 1));
    assert_eq!((years[1].year, years[1].matches, years[1].average), (2024, 2, 7.5));
}

#[test]
fn empty_fold_is_empty() {
    assert!(group_months_by_year(Vec::new()).is_empty());
}
