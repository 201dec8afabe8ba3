//! Dashboard aggregates over the habit list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::Habit;
use crate::scoring::today_progress;

/// Reference to a habit with the metric it was chosen for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitHighlight {
    pub habit_id: String,
    pub title: String,
    pub value: u32,
}

impl HabitHighlight {
    fn of(habit: &Habit, value: u32) -> Self {
        Self {
            habit_id: habit.id.clone(),
            title: habit.title.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub total_habits: usize,
    pub active_habits: usize,
    /// Habits with today's date recorded, active or not
    pub completed_today: usize,
    /// Active habits due today
    pub scheduled_today: usize,
    /// Due habits already done today
    pub scheduled_completed_today: usize,
    /// Highest current streak
    pub longest_streak: Option<HabitHighlight>,
    /// Most recorded completions
    pub most_completions: Option<HabitHighlight>,
    /// Highest streak ever reached by any habit
    pub best_ever_streak: u32,
    pub total_completions: usize,
}

impl HabitStats {
    pub fn compute(habits: &[Habit], today: NaiveDate) -> Self {
        let (scheduled_completed_today, scheduled_today) = today_progress(habits, today);
        // Ties go to the later habit, matching the dashboard's reduce.
        let longest_streak = habits
            .iter()
            .max_by_key(|h| h.streak_count)
            .map(|h| HabitHighlight::of(h, h.streak_count));
        let most_completions = habits
            .iter()
            .max_by_key(|h| h.completed_dates.len())
            .map(|h| HabitHighlight::of(h, h.completed_dates.len() as u32));

        HabitStats {
            total_habits: habits.len(),
            active_habits: habits.iter().filter(|h| h.active).count(),
            completed_today: habits.iter().filter(|h| h.is_completed_on(today)).count(),
            scheduled_today,
            scheduled_completed_today,
            longest_streak,
            most_completions,
            best_ever_streak: habits.iter().map(|h| h.longest_streak).max().unwrap_or(0),
            total_completions: habits.iter().map(|h| h.completed_dates.len()).sum(),
        }
    }

    /// Fraction of today's due habits that are done, 0 when nothing is due.
    pub fn today_progress(&self) -> f64 {
        if self.scheduled_today == 0 {
            0.0
        } else {
            self.scheduled_completed_today as f64 / self.scheduled_today as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frequency;
    use crate::scoring::complete_habit;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn empty_list_has_zeroed_stats() {
        let stats = HabitStats::compute(&[], day(1));
        assert_eq!(stats, HabitStats::default());
        assert_eq!(stats.today_progress(), 0.0);
    }

    #[test]
    fn aggregates_over_habits() {
        let mut read = Habit::new("Read", "", Frequency::Daily, day(1));
        for d in 1..=3 {
            read = complete_habit(&read, day(d)).unwrap().habit;
        }
        let mut run = Habit::new("Run", "", Frequency::Daily, day(1));
        run = complete_habit(&run, day(3)).unwrap().habit;
        run.longest_streak = 20;
        let mut old = Habit::new("Old", "", Frequency::Daily, day(1));
        old.active = false;
        let walk = Habit::new("Walk", "", Frequency::Daily, day(1));

        let stats = HabitStats::compute(&[read, run, old, walk], day(3));
        assert_eq!(stats.total_habits, 4);
        assert_eq!(stats.active_habits, 3);
        assert_eq!(stats.completed_today, 2);
        assert_eq!(stats.scheduled_today, 3);
        assert_eq!(stats.scheduled_completed_today, 2);
        assert_eq!(stats.longest_streak.as_ref().unwrap().title, "Read");
        assert_eq!(stats.longest_streak.as_ref().unwrap().value, 3);
        assert_eq!(stats.most_completions.as_ref().unwrap().value, 3);
        assert_eq!(stats.best_ever_streak, 20);
        assert_eq!(stats.total_completions, 4);
        assert!((stats.today_progress() - 2.0 / 3.0).abs() < 1e-9);
    }
}
