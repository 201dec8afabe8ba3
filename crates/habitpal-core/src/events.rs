use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::notify::{NotificationKind, NotificationPayload};
use crate::scoring::PointsBreakdown;

/// Every scoring outcome worth telling the user about produces an Event.
/// The caller forwards them to the notification scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitCompleted {
        habit_id: String,
        title: String,
        streak: u32,
        on: NaiveDate,
    },
    PointsEarned {
        habit_id: String,
        amount: u32,
        breakdown: PointsBreakdown,
    },
    /// Streak landed exactly on a milestone value.
    MilestoneReached {
        habit_id: String,
        title: String,
        streak: u32,
        bonus: u32,
    },
    /// Every habit scheduled for the day is now complete.
    DailyGoalReached {
        completed: usize,
        total: usize,
        bonus: u32,
        on: NaiveDate,
    },
}

impl Event {
    /// Notification content for this event, if it warrants one.
    ///
    /// Point awards are reflected in the balance and are not pushed.
    pub fn notification(&self) -> Option<NotificationPayload> {
        match self {
            Event::HabitCompleted { title, streak, .. } => Some(NotificationPayload {
                title: "Habit Completed".into(),
                body: format!(
                    "Great job completing {title}! Your streak is now {streak} days."
                ),
                kind: NotificationKind::Streak,
            }),
            Event::PointsEarned { .. } => None,
            Event::MilestoneReached {
                title,
                streak,
                bonus,
                ..
            } => Some(NotificationPayload {
                title: format!("{streak}-Day Milestone!"),
                body: format!(
                    "You've kept {title} going for {streak} days in a row. Enjoy {bonus} bonus points!"
                ),
                kind: NotificationKind::Achievement,
            }),
            Event::DailyGoalReached { total, bonus, .. } => Some(NotificationPayload {
                title: "All Done for Today".into(),
                body: format!(
                    "You completed all {total} of today's habits and earned a {bonus}-point consistency bonus."
                ),
                kind: NotificationKind::Achievement,
            }),
        }
    }
}
