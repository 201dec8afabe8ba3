//! Rule-based accountability partner.
//!
//! The partner answers chat messages by keyword classification and picks a
//! reply uniformly from a fixed pool. Encouragement and celebration replies
//! are personalized from the caller's habit list. All randomness comes from
//! the `rng` argument, so a seeded generator gives reproducible replies.
//!
//! No path here can fail: missing habits or check-ins fall back to the
//! unpersonalized template or a fixed message.

mod classify;
pub mod review;
mod templates;

pub use classify::{classify, ResponseCategory};
pub use review::{HabitRate, ReviewBand, StreakLeader, WeeklyReview};

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{ChatMessage, CheckIn, Habit, MessageKind};

/// Partner tuning, loaded from the `[partner]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerConfig {
    /// Encouragement cites the top streak only when it exceeds this.
    #[serde(default = "default_encouragement_threshold")]
    pub encouragement_streak_threshold: u32,
    /// Days covered by the weekly review, ending today.
    #[serde(default = "default_review_window_days")]
    pub review_window_days: u32,
    /// Fixed seed for reply selection; random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_encouragement_threshold() -> u32 {
    3
}

fn default_review_window_days() -> u32 {
    7
}

impl Default for PartnerConfig {
    fn default() -> Self {
        Self {
            encouragement_streak_threshold: default_encouragement_threshold(),
            review_window_days: default_review_window_days(),
            seed: None,
        }
    }
}

const ALL_DONE_CHALLENGE: &str = "I see you've completed all your habits for today - impressive! Here's a bonus challenge: think of one small additional action you could take today that aligns with your long-term goals. Ready to go above and beyond?";

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Habit with the highest current streak; ties go to the later habit.
fn top_streak(habits: &[Habit]) -> Option<&Habit> {
    habits.iter().max_by_key(|h| h.streak_count)
}

#[derive(Debug, Clone, Default)]
pub struct Partner {
    config: PartnerConfig,
}

impl Partner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PartnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PartnerConfig {
        &self.config
    }

    /// Greeting for an empty conversation.
    pub fn welcome<R: Rng + ?Sized>(&self, rng: &mut R) -> ChatMessage {
        ChatMessage::from_assistant(pick(&templates::WELCOME, rng), MessageKind::Encouragement)
    }

    /// Reply to a user message.
    pub fn respond<R: Rng + ?Sized>(
        &self,
        text: &str,
        habits: &[Habit],
        today: NaiveDate,
        rng: &mut R,
    ) -> ChatMessage {
        let category = classify(text);
        debug!(?category, habits = habits.len(), "classified user message");
        let pool: &[&str] = match category {
            ResponseCategory::Encouragement => return self.encouragement(habits, rng),
            ResponseCategory::Celebration => return self.celebration(habits, today, rng),
            ResponseCategory::Advice => &templates::ADVICE,
            ResponseCategory::GoalSetting => &templates::GOAL_SETTING,
            ResponseCategory::Generic => &templates::GENERIC,
        };
        ChatMessage::from_assistant(pick(pool, rng), category.message_kind())
    }

    /// Encouragement, citing the longest running streak when it is notable.
    pub fn encouragement<R: Rng + ?Sized>(&self, habits: &[Habit], rng: &mut R) -> ChatMessage {
        let mut content = pick(&templates::ENCOURAGEMENT, rng).to_string();
        if let Some(best) = top_streak(habits)
            .filter(|h| h.streak_count > self.config.encouragement_streak_threshold)
        {
            content.push_str(&format!(
                " Look at your {} habit - you've kept a {}-day streak! That's the same determination you can bring to this challenge.",
                best.title, best.streak_count
            ));
        }
        ChatMessage::from_assistant(content, MessageKind::Encouragement)
    }

    /// Celebration, citing the first habit completed today.
    pub fn celebration<R: Rng + ?Sized>(
        &self,
        habits: &[Habit],
        today: NaiveDate,
        rng: &mut R,
    ) -> ChatMessage {
        let mut content = pick(&templates::CELEBRATION, rng).to_string();
        let recent = habits.iter().find(|h| h.is_completed_on(today));
        if let Some(habit) = recent.filter(|h| h.streak_count > 0) {
            content.push_str(&format!(
                " You're on a {}-day streak with {}. Keep it up!",
                habit.streak_count, habit.title
            ));
        }
        let message = ChatMessage::from_assistant(content, MessageKind::Celebration);
        match recent {
            Some(habit) => message.related_to(habit.id.clone()),
            None => message,
        }
    }

    /// Nudge to do one habit.
    pub fn reminder<R: Rng + ?Sized>(&self, habit: &Habit, rng: &mut R) -> ChatMessage {
        let content = templates::render(pick(&templates::REMINDER, rng), &habit.title);
        ChatMessage::from_assistant(content, MessageKind::Reminder).related_to(habit.id.clone())
    }

    /// Dare the user to finish a random open habit.
    pub fn challenge<R: Rng + ?Sized>(
        &self,
        habits: &[Habit],
        today: NaiveDate,
        rng: &mut R,
    ) -> ChatMessage {
        let open: Vec<&Habit> = habits
            .iter()
            .filter(|h| h.active && !h.is_completed_on(today))
            .collect();
        match open.choose(rng) {
            Some(habit) => {
                let content = templates::render(pick(&templates::CHALLENGE, rng), &habit.title);
                ChatMessage::from_assistant(content, MessageKind::Challenge)
                    .related_to(habit.id.clone())
            }
            None => ChatMessage::from_assistant(ALL_DONE_CHALLENGE, MessageKind::Challenge),
        }
    }

    /// Completion-rate feedback for one habit over the supplied check-ins.
    pub fn feedback(&self, habit: &Habit, check_ins: &[CheckIn]) -> ChatMessage {
        let (completed, total) = check_ins
            .iter()
            .filter(|c| c.habit_id == habit.id)
            .fold((0usize, 0usize), |(done, all), c| {
                (done + usize::from(c.completed), all + 1)
            });
        let rate = if total > 0 {
            completed as f64 / total as f64
        } else {
            0.0
        };
        let pct = review::percent(rate);
        let title = &habit.title;

        let content = if total > 0 && rate >= 0.8 {
            format!("You're doing amazingly well with your \"{title}\" habit! With an {pct}% completion rate, you're building a solid foundation. Keep up the excellent work!")
        } else if total > 0 && rate >= 0.5 {
            format!("You're making good progress with your \"{title}\" habit. Your completion rate is {pct}%. What obstacles are you facing on the days you miss? Let's work on strategies to overcome them.")
        } else if total > 0 {
            format!("I've noticed you're having some challenges with your \"{title}\" habit ({pct}% completion rate). Let's revisit this goal - maybe we need to adjust it to make it more achievable or find a better time in your day for it.")
        } else {
            format!("It looks like we haven't tracked any progress for your \"{title}\" habit yet. Would you like to set up a specific time to work on this habit?")
        };
        ChatMessage::from_assistant(content, MessageKind::Feedback).related_to(habit.id.clone())
    }

    /// Summarize the last review window.
    pub fn weekly_review(
        &self,
        habits: &[Habit],
        check_ins: &[CheckIn],
        today: NaiveDate,
    ) -> WeeklyReview {
        WeeklyReview::compute(habits, check_ins, today, self.config.review_window_days)
    }
}
