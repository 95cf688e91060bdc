use crate::models::{Badge, BadgeKind};
use chrono::{DateTime, Utc};

/// Metrics of the habit whose toggle triggered evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitTrigger {
    pub current_streak: u32,
    pub completions: u64,
}

pub fn default_badges() -> Vec<Badge> {
    [
        ("1", "First Step", "Complete your first habit", "🎯", 1, BadgeKind::Completion),
        ("2", "3-Day Streak", "Maintain a 3-day streak", "🔥", 3, BadgeKind::Streak),
        ("3", "7-Day Warrior", "Achieve a 7-day streak", "⚔️", 7, BadgeKind::Streak),
        ("4", "Consistency King", "Complete 30 habits total", "👑", 30, BadgeKind::Milestone),
        ("5", "Legend", "Achieve a 21-day streak", "🏆", 21, BadgeKind::Streak),
    ]
    .into_iter()
    .map(|(id, name, description, icon, requirement, kind)| Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        requirement,
        kind,
        earned: false,
        date_earned: None,
    })
    .collect()
}

fn qualifies(badge: &Badge, trigger: HabitTrigger, total_completions: u64) -> bool {
    match badge.kind {
        BadgeKind::Completion => trigger.completions >= badge.requirement,
        BadgeKind::Streak => u64::from(trigger.current_streak) >= badge.requirement,
        BadgeKind::Milestone => total_completions >= badge.requirement,
    }
}

/// Marks every unearned badge whose threshold is met as earned at `now`.
///
/// Earned badges are never touched, so re-running with the same inputs is a
/// no-op. Returns the badges earned by this call.
pub fn evaluate_badges(
    badges: &mut [Badge],
    trigger: HabitTrigger,
    total_completions: u64,
    now: DateTime<Utc>,
) -> Vec<Badge> {
    let mut newly_earned = Vec::new();
    for badge in badges.iter_mut().filter(|badge| !badge.earned) {
        if qualifies(badge, trigger, total_completions) {
            badge.earned = true;
            badge.date_earned = Some(now);
            newly_earned.push(badge.clone());
        }
    }
    newly_earned
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    fn earned_ids(badges: &[Badge]) -> Vec<&str> {
        badges.iter().filter(|b| b.earned).map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn default_set_starts_unearned() {
        let badges = default_badges();
        assert_eq!(badges.len(), 5);
        assert!(badges.iter().all(|b| !b.earned && b.date_earned.is_none()));
    }

    #[test]
    fn first_completion_earns_first_step() {
        let mut badges = default_badges();
        let trigger = HabitTrigger { current_streak: 1, completions: 1 };
        let earned = evaluate_badges(&mut badges, trigger, 1, at(1));
        assert_eq!(earned.len(), 1);
        assert_eq!(earned[0].id, "1");
        assert_eq!(badges[0].date_earned, Some(at(1)));
    }

    #[test]
    fn streak_badges_follow_current_streak() {
        let mut badges = default_badges();
        let trigger = HabitTrigger { current_streak: 7, completions: 7 };
        evaluate_badges(&mut badges, trigger, 7, at(7));
        assert_eq!(earned_ids(&badges), vec!["1", "2", "3"]);
    }

    #[test]
    fn milestone_uses_total_across_habits() {
        let mut badges = default_badges();
        let trigger = HabitTrigger { current_streak: 0, completions: 0 };
        evaluate_badges(&mut badges, trigger, 30, at(2));
        assert_eq!(earned_ids(&badges), vec!["4"]);
    }

    #[test]
    fn re_evaluation_keeps_first_date() {
        let mut badges = default_badges();
        let trigger = HabitTrigger { current_streak: 3, completions: 3 };
        evaluate_badges(&mut badges, trigger, 3, at(3));
        let again = evaluate_badges(&mut badges, trigger, 3, at(9));
        assert!(again.is_empty());
        assert_eq!(badges[1].date_earned, Some(at(3)));
    }

    #[test]
    fn earned_badges_survive_lower_metrics() {
        let mut badges = default_badges();
        evaluate_badges(
            &mut badges,
            HabitTrigger { current_streak: 3, completions: 3 },
            3,
            at(3),
        );
        evaluate_badges(
            &mut badges,
            HabitTrigger { current_streak: 0, completions: 0 },
            0,
            at(4),
        );
        assert_eq!(earned_ids(&badges), vec!["1", "2"]);
    }
}
