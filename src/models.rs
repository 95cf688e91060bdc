use crate::dates::days_since_creation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const HABIT_COLORS: [&str; 8] = [
    "#22c55e", // green
    "#3b82f6", // blue
    "#f59e0b", // amber
    "#ef4444", // red
    "#8b5cf6", // violet
    "#06b6d4", // cyan
    "#f97316", // orange
    "#84cc16", // lime
];

pub const DEFAULT_HABIT_COLOR: &str = HABIT_COLORS[0];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    #[serde(default)]
    pub dates_completed: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
}

impl Habit {
    pub fn completions(&self) -> u64 {
        self.dates_completed.len() as u64
    }

    pub fn is_completed_on(&self, day_key: &str) -> bool {
        self.dates_completed.contains(day_key)
    }

    /// Completions per day since creation, as a rounded percentage.
    pub fn completion_rate(&self, now: DateTime<Utc>) -> u32 {
        if self.dates_completed.is_empty() {
            return 0;
        }
        let days = days_since_creation(self.created_at, now) as f64;
        (self.completions() as f64 / days * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    /// Completions of the habit that triggered evaluation.
    Completion,
    /// Current streak of the habit that triggered evaluation.
    Streak,
    /// Completions across every habit.
    Milestone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub requirement: u64,
    #[serde(rename = "type")]
    pub kind: BadgeKind,
    #[serde(default)]
    pub earned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_earned: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct NewHabitRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToggleRequest {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Habit,
    pub completion_rate: u32,
    pub completed_today: bool,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub habit: Habit,
    pub date: String,
    pub completed: bool,
    pub newly_earned: Vec<Badge>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct BadgesResponse {
    pub badges: Vec<Badge>,
    pub earned: Vec<Badge>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub summary: ProgressSummary,
    pub this_week: Vec<WeekdayPoint>,
}

#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    pub active_habits: usize,
    pub total_completed: u64,
    pub total_current_streaks: u64,
    pub best_streak: u32,
    pub completions_this_week: u64,
}

#[derive(Debug, Serialize)]
pub struct WeekdayPoint {
    pub day: String,
    pub date: String,
    pub completions: u64,
}

/// Shading bucket for a calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    None,
    Low,
    Medium,
    High,
    Full,
}

#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub in_month: bool,
    pub is_today: bool,
    pub completions: usize,
    pub habit_ids: Vec<String>,
    pub completion_rate: f64,
    pub intensity: Intensity,
}

#[derive(Debug, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub days: Vec<CalendarDay>,
}
