//! Habit completion scoring engine.
//!
//! Completing a habit for a calendar day extends its streak and awards
//! points. The award is the sum of four terms:
//!
//! | Term      | Rule                                                   |
//! |-----------|--------------------------------------------------------|
//! | base      | 10 points                                              |
//! | priority  | +5 high, +3 medium, nothing for low or unset           |
//! | streak    | +5 per completed week of streak, capped at 20          |
//! | milestone | `streak * 2` on the day the streak equals a milestone  |
//!
//! Milestones are 7, 14, 30, 60, 90, 180 and 365 days.
//!
//! Separately, a flat daily consistency bonus is awarded on the transition
//! from "some of today's habits open" to "all of today's habits done".
//! The caller passes the prior state explicitly so the bonus can never be
//! paid twice for the same day.
//!
//! Every function here is pure: inputs are borrowed, results are new values.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CompletionError;
use crate::events::Event;
use crate::model::{CheckIn, Habit, Priority};

/// Streak lengths that pay a one-time milestone bonus.
pub const DEFAULT_MILESTONES: [u32; 7] = [7, 14, 30, 60, 90, 180, 365];

/// Tunable constants of the point economy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    #[serde(default = "default_base_points")]
    pub base_points: u32,
    #[serde(default = "default_high_bonus")]
    pub high_priority_bonus: u32,
    #[serde(default = "default_medium_bonus")]
    pub medium_priority_bonus: u32,
    #[serde(default)]
    pub low_priority_bonus: u32,
    /// Streak days per bonus increment
    #[serde(default = "default_streak_step_days")]
    pub streak_step_days: u32,
    /// Points per bonus increment
    #[serde(default = "default_streak_step_points")]
    pub streak_step_points: u32,
    #[serde(default = "default_streak_bonus_cap")]
    pub streak_bonus_cap: u32,
    #[serde(default = "default_milestones")]
    pub milestones: Vec<u32>,
    #[serde(default = "default_milestone_multiplier")]
    pub milestone_multiplier: u32,
    #[serde(default = "default_daily_bonus")]
    pub daily_bonus: u32,
}

fn default_base_points() -> u32 {
    10
}
fn default_high_bonus() -> u32 {
    5
}
fn default_medium_bonus() -> u32 {
    3
}
fn default_streak_step_days() -> u32 {
    7
}
fn default_streak_step_points() -> u32 {
    5
}
fn default_streak_bonus_cap() -> u32 {
    20
}
fn default_milestones() -> Vec<u32> {
    DEFAULT_MILESTONES.to_vec()
}
fn default_milestone_multiplier() -> u32 {
    2
}
fn default_daily_bonus() -> u32 {
    15
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: default_base_points(),
            high_priority_bonus: default_high_bonus(),
            medium_priority_bonus: default_medium_bonus(),
            low_priority_bonus: 0,
            streak_step_days: default_streak_step_days(),
            streak_step_points: default_streak_step_points(),
            streak_bonus_cap: default_streak_bonus_cap(),
            milestones: default_milestones(),
            milestone_multiplier: default_milestone_multiplier(),
            daily_bonus: default_daily_bonus(),
        }
    }
}

/// Itemized award for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    pub base: u32,
    pub priority: u32,
    pub streak: u32,
    pub milestone: u32,
}

impl PointsBreakdown {
    pub fn total(&self) -> u32 {
        self.base
            .saturating_add(self.priority)
            .saturating_add(self.streak)
            .saturating_add(self.milestone)
    }
}

/// Result of a successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The habit with the day appended and streak counters bumped
    pub habit: Habit,
    /// Check-in record to persist alongside the habit
    pub check_in: CheckIn,
    pub points: PointsBreakdown,
    /// Notification-worthy outcomes, in emission order
    pub events: Vec<Event>,
}

impl Completion {
    pub fn points_earned(&self) -> u32 {
        self.points.total()
    }

    pub fn milestone_reached(&self) -> bool {
        self.points.milestone > 0
    }
}

/// Daily consistency bonus award.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBonus {
    pub points: u32,
    pub event: Event,
}

impl ScoringRules {
    pub fn priority_bonus(&self, priority: Option<Priority>) -> u32 {
        match priority {
            Some(Priority::High) => self.high_priority_bonus,
            Some(Priority::Medium) => self.medium_priority_bonus,
            Some(Priority::Low) => self.low_priority_bonus,
            None => 0,
        }
    }

    pub fn streak_bonus(&self, streak: u32) -> u32 {
        streak
            .checked_div(self.streak_step_days)
            .map(|weeks| weeks.saturating_mul(self.streak_step_points))
            .unwrap_or(0)
            .min(self.streak_bonus_cap)
    }

    pub fn milestone_bonus(&self, streak: u32) -> u32 {
        if self.milestones.contains(&streak) {
            streak.saturating_mul(self.milestone_multiplier)
        } else {
            0
        }
    }

    /// Itemize the award for reaching `new_streak` on a habit of `priority`.
    pub fn points_for(&self, priority: Option<Priority>, new_streak: u32) -> PointsBreakdown {
        PointsBreakdown {
            base: self.base_points,
            priority: self.priority_bonus(priority),
            streak: self.streak_bonus(new_streak),
            milestone: self.milestone_bonus(new_streak),
        }
    }

    /// Mark `habit` complete for `today`.
    ///
    /// # Errors
    /// Returns [`CompletionError::AlreadyCompleted`] if `today` is already
    /// recorded; the input habit is untouched either way.
    pub fn complete(&self, habit: &Habit, today: NaiveDate) -> Result<Completion, CompletionError> {
        if habit.is_completed_on(today) {
            debug!(habit_id = %habit.id, %today, "completion rejected: already recorded");
            return Err(CompletionError::AlreadyCompleted {
                habit_id: habit.id.clone(),
                date: today,
            });
        }

        let new_streak = habit.streak_count.saturating_add(1);

        let mut updated = habit.clone();
        updated.completed_dates.push(today);
        updated.streak_count = new_streak;
        updated.longest_streak = habit.longest_streak.max(new_streak);
        updated.updated_at = Utc::now();

        let points = self.points_for(habit.priority, new_streak);
        debug!(
            habit_id = %habit.id,
            streak = new_streak,
            base = points.base,
            priority = points.priority,
            streak_bonus = points.streak,
            milestone = points.milestone,
            "habit completed"
        );

        let mut events = vec![
            Event::HabitCompleted {
                habit_id: habit.id.clone(),
                title: habit.title.clone(),
                streak: new_streak,
                on: today,
            },
            Event::PointsEarned {
                habit_id: habit.id.clone(),
                amount: points.total(),
                breakdown: points,
            },
        ];
        if points.milestone > 0 {
            info!(habit_id = %habit.id, streak = new_streak, bonus = points.milestone, "milestone reached");
            events.push(Event::MilestoneReached {
                habit_id: habit.id.clone(),
                title: habit.title.clone(),
                streak: new_streak,
                bonus: points.milestone,
            });
        }

        Ok(Completion {
            check_in: CheckIn::completed(habit.id.clone(), today),
            habit: updated,
            points,
            events,
        })
    }

    /// Award the consistency bonus if today's habits just became all done.
    ///
    /// `previously_all_completed` is the value of [`all_completed_today`]
    /// before the completion that triggered this check.
    pub fn daily_consistency_bonus(
        &self,
        habits: &[Habit],
        today: NaiveDate,
        previously_all_completed: bool,
    ) -> Option<DailyBonus> {
        if previously_all_completed {
            return None;
        }
        let (completed, total) = today_progress(habits, today);
        if total == 0 || completed < total {
            return None;
        }
        info!(%today, total, bonus = self.daily_bonus, "daily consistency bonus");
        Some(DailyBonus {
            points: self.daily_bonus,
            event: Event::DailyGoalReached {
                completed,
                total,
                bonus: self.daily_bonus,
                on: today,
            },
        })
    }
}

/// Complete `habit` for `today` under the default rules.
pub fn complete_habit(habit: &Habit, today: NaiveDate) -> Result<Completion, CompletionError> {
    ScoringRules::default().complete(habit, today)
}

/// Consistency bonus under the default rules.
pub fn daily_consistency_bonus(
    habits: &[Habit],
    today: NaiveDate,
    previously_all_completed: bool,
) -> Option<DailyBonus> {
    ScoringRules::default().daily_consistency_bonus(habits, today, previously_all_completed)
}

/// `(completed, scheduled)` counts over active habits due `today`.
pub fn today_progress(habits: &[Habit], today: NaiveDate) -> (usize, usize) {
    let scheduled: Vec<&Habit> = habits.iter().filter(|h| h.is_scheduled_on(today)).collect();
    let completed = scheduled.iter().filter(|h| h.is_completed_on(today)).count();
    (completed, scheduled.len())
}

/// True when at least one habit is due today and all due habits are done.
pub fn all_completed_today(habits: &[Habit], today: NaiveDate) -> bool {
    let (completed, total) = today_progress(habits, today);
    total > 0 && completed == total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frequency;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(streak: u32, priority: Option<Priority>) -> Habit {
        let mut h = Habit::new("Read", "learning", Frequency::Daily, day(2024, 1, 1));
        h.streak_count = streak;
        h.longest_streak = streak;
        h.priority = priority;
        h
    }

    #[test]
    fn plain_completion_earns_base_points() {
        let h = habit(0, None);
        let c = complete_habit(&h, day(2024, 1, 1)).unwrap();
        assert_eq!(c.points_earned(), 10);
        assert_eq!(c.habit.streak_count, 1);
        assert_eq!(c.habit.longest_streak, 1);
        assert_eq!(c.habit.completed_dates, vec![day(2024, 1, 1)]);
        assert_eq!(c.events.len(), 2);
        assert!(!c.milestone_reached());
    }

    #[test]
    fn high_priority_week_one_milestone_pays_34() {
        let h = habit(6, Some(Priority::High));
        let c = complete_habit(&h, day(2024, 1, 7)).unwrap();
        assert_eq!(c.habit.streak_count, 7);
        assert_eq!(
            c.points,
            PointsBreakdown {
                base: 10,
                priority: 5,
                streak: 5,
                milestone: 14,
            }
        );
        assert_eq!(c.points_earned(), 34);
        assert!(matches!(
            c.events.last(),
            Some(Event::MilestoneReached { streak: 7, bonus: 14, .. })
        ));
    }

    #[test]
    fn oversized_base_points_saturate() {
        let rules = ScoringRules {
            base_points: u32::MAX,
            ..ScoringRules::default()
        };
        let c = rules
            .complete(&habit(6, Some(Priority::High)), day(2024, 1, 7))
            .unwrap();
        assert_eq!(c.points.base, u32::MAX);
        assert_eq!(c.points.priority, 5);
        assert_eq!(c.points_earned(), u32::MAX);
    }

    #[test]
    fn medium_priority_adds_three() {
        let c = complete_habit(&habit(1, Some(Priority::Medium)), day(2024, 1, 2)).unwrap();
        assert_eq!(c.points.priority, 3);
        assert_eq!(c.points_earned(), 13);
    }

    #[test]
    fn low_priority_adds_nothing() {
        let c = complete_habit(&habit(1, Some(Priority::Low)), day(2024, 1, 2)).unwrap();
        assert_eq!(c.points_earned(), 10);
    }

    #[test]
    fn streak_bonus_is_capped() {
        let rules = ScoringRules::default();
        assert_eq!(rules.streak_bonus(6), 0);
        assert_eq!(rules.streak_bonus(13), 5);
        assert_eq!(rules.streak_bonus(14), 10);
        assert_eq!(rules.streak_bonus(27), 15);
        assert_eq!(rules.streak_bonus(28), 20);
        assert_eq!(rules.streak_bonus(70), 20);
    }

    #[test]
    fn milestone_only_on_exact_values() {
        let rules = ScoringRules::default();
        for m in DEFAULT_MILESTONES {
            assert_eq!(rules.milestone_bonus(m), m * 2);
        }
        for s in [1, 6, 8, 15, 29, 31, 364, 366] {
            assert_eq!(rules.milestone_bonus(s), 0, "streak {s}");
        }
    }

    #[test]
    fn zero_step_days_disables_streak_bonus() {
        let rules = ScoringRules {
            streak_step_days: 0,
            ..Default::default()
        };
        assert_eq!(rules.streak_bonus(100), 0);
    }

    #[test]
    fn longest_streak_is_kept_when_current_is_lower() {
        let mut h = habit(2, None);
        h.longest_streak = 40;
        let c = complete_habit(&h, day(2024, 3, 1)).unwrap();
        assert_eq!(c.habit.streak_count, 3);
        assert_eq!(c.habit.longest_streak, 40);
    }

    #[test]
    fn second_completion_same_day_is_rejected() {
        let h = habit(0, None);
        let today = day(2024, 1, 1);
        let first = complete_habit(&h, today).unwrap();
        let err = complete_habit(&first.habit, today).unwrap_err();
        assert_eq!(
            err,
            CompletionError::AlreadyCompleted {
                habit_id: h.id.clone(),
                date: today,
            }
        );
    }

    #[test]
    fn check_in_is_created_for_the_day() {
        let h = habit(0, None);
        let c = complete_habit(&h, day(2024, 2, 2)).unwrap();
        assert_eq!(c.check_in.habit_id, h.id);
        assert_eq!(c.check_in.date, day(2024, 2, 2));
        assert!(c.check_in.completed);
    }

    #[test]
    fn custom_rules_change_the_award() {
        let rules = ScoringRules {
            base_points: 20,
            milestones: vec![3],
            milestone_multiplier: 10,
            ..Default::default()
        };
        let c = rules.complete(&habit(2, None), day(2024, 1, 3)).unwrap();
        assert_eq!(c.points.base, 20);
        assert_eq!(c.points.milestone, 30);
    }

    #[test]
    fn daily_bonus_fires_on_transition_only() {
        let today = day(2024, 4, 1);
        let a = habit(0, None);
        let b = habit(0, None);

        let mut habits = vec![a.clone(), b.clone()];
        let before = all_completed_today(&habits, today);
        habits[0] = complete_habit(&a, today).unwrap().habit;
        assert!(daily_consistency_bonus(&habits, today, before).is_none());

        let before = all_completed_today(&habits, today);
        assert!(!before);
        habits[1] = complete_habit(&b, today).unwrap().habit;
        let bonus = daily_consistency_bonus(&habits, today, before).unwrap();
        assert_eq!(bonus.points, 15);
        assert!(matches!(
            bonus.event,
            Event::DailyGoalReached { completed: 2, total: 2, bonus: 15, .. }
        ));

        let before = all_completed_today(&habits, today);
        assert!(before);
        assert!(daily_consistency_bonus(&habits, today, before).is_none());
    }

    #[test]
    fn daily_bonus_ignores_unscheduled_and_inactive_habits() {
        let today = day(2024, 1, 2);
        let done = complete_habit(&habit(0, None), today).unwrap().habit;

        let mut archived = habit(0, None);
        archived.active = false;
        let weekly = Habit::new("Long run", "health", Frequency::Weekly, day(2024, 1, 1));

        let habits = vec![done, archived, weekly];
        assert_eq!(today_progress(&habits, today), (1, 1));
        assert!(daily_consistency_bonus(&habits, today, false).is_some());
    }

    #[test]
    fn daily_bonus_needs_something_scheduled() {
        assert!(daily_consistency_bonus(&[], day(2024, 1, 1), false).is_none());
        assert!(!all_completed_today(&[], day(2024, 1, 1)));
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        let rules: ScoringRules = toml::from_str("base_points = 12").unwrap();
        assert_eq!(rules.base_points, 12);
        assert_eq!(rules.daily_bonus, 15);
        assert_eq!(rules.milestones, DEFAULT_MILESTONES.to_vec());
    }
}
