//! The habit store owns the habit and badge collections and is the only
//! place they are mutated.
//!
//! Every mutation builds the next collections from copies, writes both to the
//! backing [`KeyValueStore`], and only then swaps them in. A failed write
//! therefore leaves the in-memory state untouched.

use crate::badges::{HabitTrigger, default_badges, evaluate_badges};
use crate::dates::canonical_day_key;
use crate::errors::StoreError;
use crate::models::{Badge, DEFAULT_HABIT_COLOR, HABIT_COLORS, Habit};
use crate::storage::{BADGES_KEY, HABITS_KEY, KeyValueStore, encode_collection, load_collection};
use crate::streaks::compute_streaks_at;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub habit: Habit,
    /// Whether the day is completed after the toggle.
    pub completed: bool,
    pub newly_earned: Vec<Badge>,
}

#[derive(Debug)]
pub struct HabitStore<S> {
    storage: S,
    habits: Vec<Habit>,
    badges: Vec<Badge>,
}

impl<S: KeyValueStore> HabitStore<S> {
    /// Loads both collections, starting from no habits and the default badges
    /// when nothing usable is stored.
    pub fn load(storage: S) -> Self {
        let habits: Vec<Habit> = load_collection(&storage, HABITS_KEY, Vec::new);
        let badges: Vec<Badge> = load_collection(&storage, BADGES_KEY, default_badges);
        info!(habits = habits.len(), badges = badges.len(), "habit store loaded");
        Self {
            storage,
            habits,
            badges,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == habit_id)
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn earned_badges(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter().filter(|badge| badge.earned)
    }

    pub fn total_completions(&self) -> u64 {
        self.habits.iter().map(Habit::completions).sum()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add_habit(
        &mut self,
        name: &str,
        description: &str,
        color: &str,
    ) -> Result<Option<Habit>, StoreError> {
        self.add_habit_at(name, description, color, Utc::now())
    }

    /// Returns `Ok(None)` without touching state when `name` is blank.
    pub fn add_habit_at(
        &mut self,
        name: &str,
        description: &str,
        color: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Habit>, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            warn!("rejected habit with blank name");
            return Ok(None);
        }

        let habit = Habit {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.trim().to_string(),
            color: palette_color(color).to_string(),
            dates_completed: Default::default(),
            created_at: now,
            current_streak: 0,
            longest_streak: 0,
        };

        let mut habits = self.habits.clone();
        habits.push(habit.clone());
        self.commit(habits, self.badges.clone())?;

        info!(habit_id = %habit.id, name = %habit.name, "habit added");
        Ok(Some(habit))
    }

    pub fn toggle_completion(
        &mut self,
        habit_id: &str,
        day_key: &str,
    ) -> Result<Option<ToggleOutcome>, StoreError> {
        self.toggle_completion_at(habit_id, day_key, Utc::now())
    }

    /// Flips `day_key` for the habit, recomputes its streaks as of `now` and
    /// awards any badges the new totals unlock. Unknown habits are a no-op.
    pub fn toggle_completion_at(
        &mut self,
        habit_id: &str,
        day_key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ToggleOutcome>, StoreError> {
        let Some(index) = self.habits.iter().position(|habit| habit.id == habit_id) else {
            return Ok(None);
        };
        let day_key =
            canonical_day_key(day_key).ok_or_else(|| StoreError::InvalidDayKey(day_key.into()))?;

        let mut habits = self.habits.clone();
        let habit = &mut habits[index];
        let completed = if habit.dates_completed.remove(&day_key) {
            false
        } else {
            habit.dates_completed.insert(day_key.clone());
            true
        };

        let streaks = compute_streaks_at(
            habit.dates_completed.iter().map(String::as_str),
            now.date_naive(),
        );
        habit.current_streak = streaks.current;
        habit.longest_streak = streaks.longest;

        let trigger = HabitTrigger {
            current_streak: habit.current_streak,
            completions: habit.completions(),
        };
        let updated = habit.clone();
        let total: u64 = habits.iter().map(Habit::completions).sum();

        let mut badges = self.badges.clone();
        let newly_earned = evaluate_badges(&mut badges, trigger, total, now);

        self.commit(habits, badges)?;

        info!(
            habit_id,
            day = %day_key,
            completed,
            current_streak = updated.current_streak,
            longest_streak = updated.longest_streak,
            "completion toggled"
        );
        for badge in &newly_earned {
            info!(badge_id = %badge.id, badge = %badge.name, "badge earned");
        }

        Ok(Some(ToggleOutcome {
            habit: updated,
            completed,
            newly_earned,
        }))
    }

    /// Removes the habit. Badges it earned stay earned.
    pub fn delete_habit(&mut self, habit_id: &str) -> Result<bool, StoreError> {
        if self.habit(habit_id).is_none() {
            return Ok(false);
        }

        let habits = self
            .habits
            .iter()
            .filter(|habit| habit.id != habit_id)
            .cloned()
            .collect();
        self.commit(habits, self.badges.clone())?;

        info!(habit_id, "habit deleted");
        Ok(true)
    }

    fn commit(&mut self, habits: Vec<Habit>, badges: Vec<Badge>) -> Result<(), StoreError> {
        let habits_payload = encode_collection(HABITS_KEY, &habits)?;
        let badges_payload = encode_collection(BADGES_KEY, &badges)?;
        self.storage.set(HABITS_KEY, habits_payload)?;
        self.storage.set(BADGES_KEY, badges_payload)?;

        self.habits = habits;
        self.badges = badges;
        Ok(())
    }
}

fn palette_color(color: &str) -> &'static str {
    let color = color.trim();
    if color.is_empty() {
        return DEFAULT_HABIT_COLOR;
    }
    match HABIT_COLORS
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(color))
    {
        Some(candidate) => candidate,
        None => {
            warn!(color, "color outside palette, using default");
            DEFAULT_HABIT_COLOR
        }
    }
}
