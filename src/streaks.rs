use crate::dates::{parse_day_key, today};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;
use tracing::warn;

/// Longest backward walk when counting the current streak.
pub const CURRENT_STREAK_WINDOW: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

pub fn compute_streaks<'a, I>(day_keys: I) -> Streaks
where
    I: IntoIterator<Item = &'a str>,
{
    compute_streaks_at(day_keys, today())
}

pub fn compute_streaks_at<'a, I>(day_keys: I, today: NaiveDate) -> Streaks
where
    I: IntoIterator<Item = &'a str>,
{
    let mut days = BTreeSet::new();
    for key in day_keys {
        match parse_day_key(key) {
            Some(day) => {
                days.insert(day);
            }
            None => warn!(key, "skipping malformed day key"),
        }
    }

    if days.is_empty() {
        return Streaks::default();
    }

    Streaks {
        current: current_streak(&days, today),
        longest: longest_streak(&days),
    }
}

fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today - Duration::days(1);
    // today may still be in progress, so an open today does not break the run
    let mut cursor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while streak < CURRENT_STREAK_WINDOW && days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        run = match previous {
            Some(prev) if (day - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> NaiveDate {
        parse_day_key(value).unwrap()
    }

    #[test]
    fn empty_input_has_no_streaks() {
        let streaks = compute_streaks_at(Vec::<&str>::new(), day("2024-01-03"));
        assert_eq!(streaks, Streaks { current: 0, longest: 0 });
    }

    #[test]
    fn consecutive_days_ending_today() {
        let keys = ["2024-01-01", "2024-01-02", "2024-01-03"];
        let streaks = compute_streaks_at(keys, day("2024-01-03"));
        assert_eq!(streaks, Streaks { current: 3, longest: 3 });
    }

    #[test]
    fn gap_splits_runs() {
        let keys = ["2024-01-01", "2024-01-03"];
        let streaks = compute_streaks_at(keys, day("2024-01-03"));
        assert_eq!(streaks, Streaks { current: 1, longest: 1 });
    }

    #[test]
    fn missing_today_counts_from_yesterday() {
        let keys = ["2024-01-01", "2024-01-02"];
        let streaks = compute_streaks_at(keys, day("2024-01-03"));
        assert_eq!(streaks.current, 2);
    }

    #[test]
    fn missing_today_and_yesterday_resets_current() {
        let keys = ["2024-01-01", "2024-01-02"];
        let streaks = compute_streaks_at(keys, day("2024-01-04"));
        assert_eq!(streaks, Streaks { current: 0, longest: 2 });
    }

    #[test]
    fn duplicates_and_order_do_not_matter() {
        let shuffled = ["2024-01-03", "2024-01-01", "2024-01-02", "2024-01-01", "2024-01-03"];
        let sorted = ["2024-01-01", "2024-01-02", "2024-01-03"];
        let today = day("2024-01-03");
        assert_eq!(compute_streaks_at(shuffled, today), compute_streaks_at(sorted, today));
        assert_eq!(compute_streaks_at(shuffled, today).longest, 3);
    }

    #[test]
    fn single_entry_has_longest_of_one() {
        let streaks = compute_streaks_at(["2023-06-01"], day("2024-01-03"));
        assert_eq!(streaks, Streaks { current: 0, longest: 1 });
    }

    #[test]
    fn longest_picks_best_run() {
        let keys = [
            "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04",
            "2024-01-10", "2024-01-11",
        ];
        let streaks = compute_streaks_at(keys, day("2024-01-11"));
        assert_eq!(streaks, Streaks { current: 2, longest: 4 });
    }

    #[test]
    fn current_streak_stops_at_window() {
        let today = day("2024-12-31");
        let keys: Vec<String> = (0..400)
            .map(|offset| crate::dates::date_key(today - Duration::days(offset)))
            .collect();
        let streaks = compute_streaks_at(keys.iter().map(String::as_str), today);
        assert_eq!(streaks.current, CURRENT_STREAK_WINDOW);
        assert_eq!(streaks.longest, 400);
    }

    #[test]
    fn malformed_keys_are_skipped() {
        let keys = ["2024-01-02", "garbage", "2024-01-03"];
        let streaks = compute_streaks_at(keys, day("2024-01-03"));
        assert_eq!(streaks, Streaks { current: 2, longest: 2 });
    }

    #[test]
    fn longest_never_below_current() {
        let today = day("2024-03-01");
        let samples: [&[&str]; 5] = [
            &[],
            &["2024-03-01"],
            &["2024-02-29", "2024-03-01"],
            &["2024-02-27", "2024-02-29"],
            &["2024-02-01", "2024-02-02", "2024-02-29", "2024-03-01", "2024-03-05"],
        ];
        for keys in samples {
            let streaks = compute_streaks_at(keys.iter().copied(), today);
            assert!(streaks.longest >= streaks.current, "{keys:?}");
        }
    }
}
