use crate::dates::{date_key, today, week_start};
use crate::models::{
    CalendarDay, CalendarMonth, Habit, Intensity, ProgressSummary, StatsResponse, WeekdayPoint,
};
use chrono::{Datelike, Duration, NaiveDate};

const CALENDAR_CELLS: i64 = 42;

pub fn build_stats(habits: &[Habit]) -> StatsResponse {
    build_stats_at(today(), habits)
}

pub fn build_stats_at(today: NaiveDate, habits: &[Habit]) -> StatsResponse {
    let this_week = weekly_progress_at(today, habits);

    let summary = ProgressSummary {
        active_habits: habits.len(),
        total_completed: habits.iter().map(Habit::completions).sum(),
        total_current_streaks: habits.iter().map(|h| u64::from(h.current_streak)).sum(),
        best_streak: habits.iter().map(|h| h.longest_streak).max().unwrap_or(0),
        completions_this_week: this_week.iter().map(|point| point.completions).sum(),
    };

    StatsResponse { summary, this_week }
}

/// One point per day, Sunday through Saturday of the week containing `today`.
pub fn weekly_progress_at(today: NaiveDate, habits: &[Habit]) -> Vec<WeekdayPoint> {
    let Some(start) = week_start(today) else {
        return Vec::new();
    };
    (0..7)
        .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
        .map(|date| {
            let key = date_key(date);
            WeekdayPoint {
                day: date.format("%a").to_string(),
                completions: habits.iter().filter(|h| h.is_completed_on(&key)).count() as u64,
                date: key,
            }
        })
        .collect()
}

/// Six-week grid for `year`-`month`, starting on the Sunday on or before the
/// 1st. Returns `None` for an impossible month or a grid that would leave
/// the representable date range.
pub fn build_calendar_at(
    today: NaiveDate,
    habits: &[Habit],
    year: i32,
    month: u32,
) -> Option<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let start = week_start(first)?;

    let days = (0..CALENDAR_CELLS)
        .map(|offset| {
            let date = start.checked_add_signed(Duration::days(offset))?;
            let key = date_key(date);
            let habit_ids: Vec<String> = habits
                .iter()
                .filter(|h| h.is_completed_on(&key))
                .map(|h| h.id.clone())
                .collect();
            let completion_rate = if habits.is_empty() {
                0.0
            } else {
                habit_ids.len() as f64 / habits.len() as f64
            };

            Some(CalendarDay {
                in_month: date.month0() == first.month0(),
                is_today: date == today,
                completions: habit_ids.len(),
                intensity: intensity(habit_ids.len(), completion_rate),
                completion_rate,
                habit_ids,
                date: key,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(CalendarMonth {
        year,
        month,
        label: first.format("%B %Y").to_string(),
        days,
    })
}

fn intensity(completions: usize, rate: f64) -> Intensity {
    if completions == 0 {
        Intensity::None
    } else if rate >= 1.0 {
        Intensity::Full
    } else if rate >= 0.7 {
        Intensity::High
    } else if rate >= 0.3 {
        Intensity::Medium
    } else {
        Intensity::Low
    }
}
