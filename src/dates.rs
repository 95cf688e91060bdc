//! Calendar-day keys.
//!
//! Every day key is a UTC calendar day formatted as `YYYY-MM-DD`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn to_day_key(timestamp: DateTime<Utc>) -> String {
    date_key(timestamp.date_naive())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DAY_KEY_FORMAT).ok()
}

/// Re-formats a parseable key into its zero-padded form (`2024-1-3` becomes `2024-01-03`).
pub fn canonical_day_key(key: &str) -> Option<String> {
    parse_day_key(key).map(date_key)
}

/// Signed number of days from `key_a` to `key_b`.
pub fn days_between(key_a: &str, key_b: &str) -> Option<i64> {
    let a = parse_day_key(key_a)?;
    let b = parse_day_key(key_b)?;
    Some((b - a).num_days())
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn today_key() -> String {
    date_key(today())
}

/// Sunday on or before `date`, or `None` when that falls before `NaiveDate::MIN`.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_sunday() as i64))
}

/// Whole days elapsed since `created_at`, rounded up, never below 1.
pub fn days_since_creation(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = if now >= created_at {
        now - created_at
    } else {
        created_at - now
    };
    let whole = elapsed.num_days();
    let days = if elapsed > Duration::days(whole) { whole + 1 } else { whole };
    days.max(1)
}
