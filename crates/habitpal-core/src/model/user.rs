//! The user profile and app settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Habit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Best current streak across all habits
    #[serde(default)]
    pub streak_count: u32,
    /// Point balance earned from completions and bonuses
    #[serde(default)]
    pub virtual_currency: u64,
    pub joined_date: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            streak_count: 0,
            virtual_currency: 0,
            joined_date: now,
            last_active: now,
        }
    }

    /// Add earned points to the balance.
    pub fn credit(&mut self, points: u32) {
        self.virtual_currency = self.virtual_currency.saturating_add(u64::from(points));
        self.last_active = Utc::now();
    }

    /// Raise the aggregate streak to the best habit streak.
    ///
    /// Never lowers the stored value. Returns true when it changed.
    pub fn sync_streak(&mut self, habits: &[Habit]) -> bool {
        let best = habits.iter().map(|h| h.streak_count).max().unwrap_or(0);
        if best > self.streak_count {
            self.streak_count = best;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// User-facing preferences persisted under the `settings` store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub vibration_enabled: bool,
    #[serde(default = "default_reminder_time")]
    pub reminder_time: String,
}

fn default_true() -> bool {
    true
}

fn default_reminder_time() -> String {
    "09:00".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications_enabled: true,
            sound_enabled: true,
            vibration_enabled: true,
            reminder_time: default_reminder_time(),
        }
    }
}
