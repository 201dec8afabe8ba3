//! Weekly progress review.
//!
//! Groups the check-ins of the last review window by habit, ranks active
//! habits by completion rate and renders a summary message. A window
//! without check-ins renders a fixed fallback instead of a zero report.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{ChatMessage, CheckIn, Habit, MessageKind};

const NO_CHECK_INS: &str = indoc::indoc! {"
    📊 **Weekly Progress Review** 📊

    I don't have any check-ins from this past week yet, so there's nothing to grade.
    Complete one habit today and next week's review will have real progress to celebrate."};

/// Completion rate of one habit within the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRate {
    pub habit_id: String,
    pub title: String,
    pub completed: usize,
    pub total: usize,
    pub rate: f64,
}

/// Habit holding the longest current streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakLeader {
    pub habit_id: String,
    pub title: String,
    pub streak: u32,
}

/// Overall completion band that selects the closing copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewBand {
    /// At least 80% of check-ins completed
    Excellent,
    /// At least 50%
    Good,
    Struggling,
}

impl ReviewBand {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 0.8 {
            ReviewBand::Excellent
        } else if rate >= 0.5 {
            ReviewBand::Good
        } else {
            ReviewBand::Struggling
        }
    }

    fn closing(self) -> &'static str {
        match self {
            ReviewBand::Excellent => "Excellent week! You're showing great consistency. For next week, consider adding a new challenge or increasing the difficulty of an existing habit slightly.",
            ReviewBand::Good => "Good progress this week! To improve further, try to identify what made the difference between the days you completed your habits and the days you didn't.",
            ReviewBand::Struggling => "This week had some challenges, but that's part of the journey. Let's simplify your habits or adjust your schedule to make them more achievable next week.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReview {
    /// First day of the window (inclusive)
    pub window_start: NaiveDate,
    /// Last day of the window (inclusive)
    pub window_end: NaiveDate,
    /// Completed check-ins in the window
    pub completed: usize,
    /// All check-ins in the window
    pub total: usize,
    /// Rates for every habit, in input order
    pub per_habit: Vec<HabitRate>,
    /// Highest-rate active habit with samples
    pub best: Option<HabitRate>,
    /// Lowest-rate active habit with samples
    pub worst: Option<HabitRate>,
    pub top_streak: Option<StreakLeader>,
}

/// Rounded percentage of a 0..=1 rate.
pub(crate) fn percent(rate: f64) -> u32 {
    (rate * 100.0).round() as u32
}

impl WeeklyReview {
    /// Aggregate `check_ins` dated within the `window_days` days ending `today`.
    pub fn compute(
        habits: &[Habit],
        check_ins: &[CheckIn],
        today: NaiveDate,
        window_days: u32,
    ) -> Self {
        let window_start = today
            .checked_sub_days(Days::new(u64::from(window_days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN);
        let recent: Vec<&CheckIn> = check_ins
            .iter()
            .filter(|c| c.date >= window_start && c.date <= today)
            .collect();

        let per_habit: Vec<HabitRate> = habits
            .iter()
            .map(|habit| {
                let (completed, total) = recent
                    .iter()
                    .filter(|c| c.habit_id == habit.id)
                    .fold((0usize, 0usize), |(done, all), c| {
                        (done + usize::from(c.completed), all + 1)
                    });
                HabitRate {
                    habit_id: habit.id.clone(),
                    title: habit.title.clone(),
                    completed,
                    total,
                    rate: if total > 0 {
                        completed as f64 / total as f64
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        // Only active habits that were actually checked in are ranked.
        // Ties resolve to the later habit on both ends.
        let ranked = habits
            .iter()
            .zip(&per_habit)
            .filter(|(habit, rate)| habit.active && rate.total > 0)
            .map(|(_, rate)| rate);
        let (best, worst) = ranked.fold(
            (None::<&HabitRate>, None::<&HabitRate>),
            |(best, worst), r| {
                let best = match best {
                    Some(b) if b.rate > r.rate => Some(b),
                    _ => Some(r),
                };
                let worst = match worst {
                    Some(w) if w.rate < r.rate => Some(w),
                    _ => Some(r),
                };
                (best, worst)
            },
        );

        let top_streak = habits
            .iter()
            .filter(|h| h.streak_count > 0)
            .max_by_key(|h| h.streak_count)
            .map(|h| StreakLeader {
                habit_id: h.id.clone(),
                title: h.title.clone(),
                streak: h.streak_count,
            });

        let completed = recent.iter().filter(|c| c.completed).count();
        debug!(%window_start, %today, total = recent.len(), completed, "weekly review aggregated");

        WeeklyReview {
            window_start,
            window_end: today,
            completed,
            total: recent.len(),
            best: best.cloned(),
            worst: worst.cloned(),
            per_habit,
            top_streak,
        }
    }

    pub fn has_check_ins(&self) -> bool {
        self.total > 0
    }

    /// Share of completed check-ins; zero for an empty window.
    pub fn overall_rate(&self) -> f64 {
        if self.total > 0 {
            self.completed as f64 / self.total as f64
        } else {
            0.0
        }
    }

    pub fn band(&self) -> ReviewBand {
        ReviewBand::from_rate(self.overall_rate())
    }

    /// Markdown summary suitable for the chat transcript.
    pub fn render(&self) -> String {
        if !self.has_check_ins() {
            let mut text = NO_CHECK_INS.to_string();
            if let Some(leader) = &self.top_streak {
                text.push_str(&format!(
                    "\n\n🔥 Your longest current streak is {} days for \"{}\"!",
                    leader.streak, leader.title
                ));
            }
            return text;
        }

        let mut text = String::from("📊 **Weekly Progress Review** 📊\n\n");
        text.push_str(&format!(
            "Overall, you completed {} out of {} planned activities this week ({}%).\n\n",
            self.completed,
            self.total,
            percent(self.overall_rate())
        ));

        if let Some(best) = self.best.as_ref().filter(|b| b.rate > 0.0) {
            text.push_str(&format!(
                "🌟 Your strongest habit was \"{}\" with a {}% completion rate. Great job!\n\n",
                best.title,
                percent(best.rate)
            ));
        }
        if let Some(worst) = self.worst.as_ref().filter(|w| w.rate < 1.0) {
            text.push_str(&format!(
                "💪 You might want to focus more on \"{}\" next week, which had a {}% completion rate.\n\n",
                worst.title,
                percent(worst.rate)
            ));
        }
        if let Some(leader) = &self.top_streak {
            text.push_str(&format!(
                "🔥 Your longest current streak is {} days for \"{}\"!\n\n",
                leader.streak, leader.title
            ));
        }

        text.push_str(self.band().closing());
        text
    }

    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::from_assistant(self.render(), MessageKind::Feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frequency;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn habit(title: &str, streak: u32) -> Habit {
        let mut h = Habit::new(title, "", Frequency::Daily, day(1));
        h.streak_count = streak;
        h.longest_streak = streak;
        h
    }

    fn check_ins(habit: &Habit, done: &[u32], missed: &[u32]) -> Vec<CheckIn> {
        let mut v: Vec<CheckIn> = done
            .iter()
            .map(|d| CheckIn::completed(habit.id.clone(), day(*d)))
            .collect();
        v.extend(missed.iter().map(|d| CheckIn::missed(habit.id.clone(), day(*d))));
        v
    }

    #[test]
    fn empty_window_renders_fallback() {
        let read = habit("Read", 0);
        let old = check_ins(&read, &[1, 2], &[]);
        let review = WeeklyReview::compute(&[read], &old, day(20), 7);

        assert!(!review.has_check_ins());
        assert_eq!(review.overall_rate(), 0.0);
        assert!(review.best.is_none());
        let text = review.render();
        assert!(text.starts_with("📊 **Weekly Progress Review** 📊\n\nI don't have any check-ins"));
        assert!(!text.contains("Overall"));
    }

    #[test]
    fn no_habits_no_check_ins_is_not_an_error() {
        let review = WeeklyReview::compute(&[], &[], day(20), 7);
        assert_eq!(review.total, 0);
        assert!(review.per_habit.is_empty());
        assert!(!review.render().is_empty());
    }

    #[test]
    fn window_is_seven_days_ending_today() {
        let read = habit("Read", 0);
        // 13 is outside (20 - 6 = 14), 21 is in the future
        let all = check_ins(&read, &[13, 14, 20, 21], &[]);
        let review = WeeklyReview::compute(&[read], &all, day(20), 7);
        assert_eq!(review.window_start, day(14));
        assert_eq!(review.total, 2);
    }

    #[test]
    fn ranks_best_and_worst_active_habits() {
        let read = habit("Read", 3);
        let run = habit("Run", 12);
        let mut idle = habit("Idle", 0);
        idle.active = false;

        let mut all = check_ins(&read, &[14, 15, 16, 17], &[18]);
        all.extend(check_ins(&run, &[14], &[15, 16]));
        all.extend(check_ins(&idle, &[], &[14, 15]));

        let review = WeeklyReview::compute(&[read, run, idle], &all, day(20), 7);
        assert_eq!(review.completed, 5);
        assert_eq!(review.total, 10);
        assert_eq!(review.best.as_ref().unwrap().title, "Read");
        assert_eq!(review.worst.as_ref().unwrap().title, "Run");
        assert_eq!(review.band(), ReviewBand::Good);

        let text = review.render();
        assert!(text.contains("completed 5 out of 10 planned activities this week (50%)"));
        assert!(text.contains("strongest habit was \"Read\" with a 80% completion rate"));
        assert!(text.contains("focus more on \"Run\" next week, which had a 33% completion rate"));
        assert!(text.contains("longest current streak is 12 days for \"Run\""));
        assert!(text.ends_with(ReviewBand::Good.closing()));
    }

    #[test]
    fn perfect_week_omits_focus_line() {
        let read = habit("Read", 7);
        let all = check_ins(&read, &[14, 15, 16, 17, 18, 19, 20], &[]);
        let review = WeeklyReview::compute(&[read], &all, day(20), 7);
        let text = review.render();
        assert_eq!(review.band(), ReviewBand::Excellent);
        assert!(text.contains("strongest habit"));
        assert!(!text.contains("focus more on"));
    }

    #[test]
    fn zero_rate_week_omits_strongest_line() {
        let read = habit("Read", 0);
        let all = check_ins(&read, &[], &[18, 19]);
        let review = WeeklyReview::compute(&[read], &all, day(20), 7);
        let text = review.render();
        assert_eq!(review.band(), ReviewBand::Struggling);
        assert!(!text.contains("strongest habit"));
        assert!(text.contains("focus more on \"Read\""));
        assert!(!text.contains("longest current streak"));
    }

    #[test]
    fn ties_resolve_to_later_habit() {
        let a = habit("A", 0);
        let b = habit("B", 0);
        let mut all = check_ins(&a, &[19], &[20]);
        all.extend(check_ins(&b, &[19], &[20]));
        let review = WeeklyReview::compute(&[a, b], &all, day(20), 7);
        assert_eq!(review.best.unwrap().title, "B");
        assert_eq!(review.worst.unwrap().title, "B");
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ReviewBand::from_rate(0.8), ReviewBand::Excellent);
        assert_eq!(ReviewBand::from_rate(0.79), ReviewBand::Good);
        assert_eq!(ReviewBand::from_rate(0.5), ReviewBand::Good);
        assert_eq!(ReviewBand::from_rate(0.49), ReviewBand::Struggling);
    }

    #[test]
    fn review_message_is_feedback() {
        let msg = WeeklyReview::compute(&[], &[], day(20), 7).to_message();
        assert_eq!(msg.kind, Some(MessageKind::Feedback));
    }
}
