//! Habits and their per-day check-ins.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// How much a habit matters; feeds the priority bonus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("expected high, medium or low, got '{other}'"),
            }),
        }
    }
}

/// Repetition cadence of a habit.
///
/// Stored as a plain string so that unknown cadences written by other
/// clients survive a round trip as [`Frequency::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Custom(String),
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Daily
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            _ => Frequency::Custom(s),
        }
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.to_string()
    }
}

impl FromStr for Frequency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Frequency::from(s.to_string()))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => f.write_str("daily"),
            Frequency::Weekly => f.write_str("weekly"),
            Frequency::Monthly => f.write_str("monthly"),
            Frequency::Custom(s) => f.write_str(s),
        }
    }
}

/// A tracked habit.
///
/// Invariants maintained by the scoring engine:
/// - `longest_streak >= streak_count`
/// - `completed_dates` holds each calendar day at most once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier
    pub id: String,
    /// Habit title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Free-form category (e.g. "health", "learning")
    #[serde(default)]
    pub category: String,
    /// Repetition cadence
    #[serde(default)]
    pub frequency: Frequency,
    /// First day the habit is tracked; anchors weekly schedules
    pub start_date: NaiveDate,
    /// Reminder time of day, `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Consecutive completed days ending at or before today
    #[serde(default)]
    pub streak_count: u32,
    /// Best streak ever reached
    #[serde(default)]
    pub longest_streak: u32,
    /// Calendar days the habit was completed, in completion order
    #[serde(default)]
    pub completed_dates: Vec<NaiveDate>,
    /// Archived habits are kept but never scheduled
    #[serde(default = "default_true")]
    pub active: bool,
    /// Display color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

fn default_true() -> bool {
    true
}

impl Habit {
    /// Create a new active habit with no history.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Habit {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            category: category.into(),
            frequency,
            start_date,
            reminder_time: None,
            created_at: now,
            updated_at: now,
            streak_count: 0,
            longest_streak: 0,
            completed_dates: Vec::new(),
            active: true,
            color: None,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reminder(mut self, time: impl Into<String>) -> Self {
        self.reminder_time = Some(time.into());
        self
    }

    /// Whether `day` is already recorded as completed.
    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completed_dates.contains(&day)
    }

    /// Whether the habit is due on `day`.
    ///
    /// Weekly habits fall due every seventh day counted from `start_date`.
    /// Monthly and custom cadences are treated as due every day.
    pub fn is_scheduled_on(&self, day: NaiveDate) -> bool {
        if !self.active {
            return false;
        }
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Weekly => {
                let diff = (day - self.start_date).num_days();
                diff >= 0 && diff % 7 == 0
            }
            Frequency::Monthly | Frequency::Custom(_) => true,
        }
    }

    /// Parse the reminder time into `(hour, minute)`.
    pub fn reminder_hour_minute(&self) -> Option<Result<(u32, u32), ValidationError>> {
        self.reminder_time.as_deref().map(parse_time_of_day)
    }
}

/// Parse an `HH:MM` time of day.
pub fn parse_time_of_day(s: &str) -> Result<(u32, u32), ValidationError> {
    let err = || ValidationError::InvalidTime(s.to_string());
    let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
    let hour: u32 = h.parse().map_err(|_| err())?;
    let minute: u32 = m.parse().map_err(|_| err())?;
    if hour > 23 || minute > 59 {
        return Err(err());
    }
    Ok((hour, minute))
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_day(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

/// A per-day, per-habit completion record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: String,
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl CheckIn {
    /// Record a completion of `habit_id` on `date`.
    pub fn completed(habit_id: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(habit_id, date, true)
    }

    /// Record a missed day.
    pub fn missed(habit_id: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(habit_id, date, false)
    }

    fn new(habit_id: impl Into<String>, date: NaiveDate, completed: bool) -> Self {
        CheckIn {
            id: uuid::Uuid::new_v4().to_string(),
            habit_id: habit_id.into(),
            date,
            completed,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn new_habit_starts_empty_and_active() {
        let habit = Habit::new("Read", "learning", Frequency::Daily, day("2024-01-01"));
        assert!(habit.active);
        assert_eq!(habit.streak_count, 0);
        assert_eq!(habit.longest_streak, 0);
        assert!(habit.completed_dates.is_empty());
        assert!(habit.priority.is_none());
        assert!(!habit.id.is_empty());
    }

    #[test]
    fn weekly_habit_is_scheduled_every_seventh_day() {
        let habit = Habit::new("Long run", "health", Frequency::Weekly, day("2024-01-01"));
        assert!(habit.is_scheduled_on(day("2024-01-01")));
        assert!(!habit.is_scheduled_on(day("2024-01-02")));
        assert!(habit.is_scheduled_on(day("2024-01-08")));
        assert!(habit.is_scheduled_on(day("2024-01-29")));
        assert!(!habit.is_scheduled_on(day("2023-12-25")));
    }

    #[test]
    fn inactive_habit_is_never_scheduled() {
        let mut habit = Habit::new("Floss", "health", Frequency::Daily, day("2024-01-01"));
        habit.active = false;
        assert!(!habit.is_scheduled_on(day("2024-01-05")));
    }

    #[test]
    fn monthly_and_custom_fall_back_to_every_day() {
        let monthly = Habit::new("Budget", "money", Frequency::Monthly, day("2024-01-01"));
        let custom = Habit::new("Call mom", "family", "weekends".parse().unwrap(), day("2024-01-01"));
        assert!(monthly.is_scheduled_on(day("2024-01-17")));
        assert!(custom.is_scheduled_on(day("2024-01-17")));
        assert_eq!(custom.frequency, Frequency::Custom("weekends".into()));
    }

    #[test]
    fn habit_json_uses_camel_case_and_plain_strings() {
        let habit = Habit::new("Read", "learning", Frequency::Weekly, day("2024-01-01"))
            .with_priority(Priority::High);
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["frequency"], "weekly");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["startDate"], "2024-01-01");
        assert!(json.get("streakCount").is_some());
        assert!(json.get("completedDates").is_some());
    }

    #[test]
    fn habit_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "id": "h1",
            "title": "Meditate",
            "startDate": "2024-02-01",
            "createdAt": "2024-02-01T08:00:00Z",
            "updatedAt": "2024-02-01T08:00:00Z",
            "frequency": "every other day"
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert!(habit.active);
        assert_eq!(habit.frequency, Frequency::Custom("every other day".into()));
        assert!(habit.completed_dates.is_empty());
    }

    #[test]
    fn parses_priority_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" medium ".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn parses_time_of_day() {
        assert_eq!(parse_time_of_day("09:30").unwrap(), (9, 30));
        assert_eq!(parse_time_of_day("23:59").unwrap(), (23, 59));
        assert!(parse_time_of_day("24:00").is_err());
        assert!(parse_time_of_day("9h30").is_err());

        let habit = Habit::new("Read", "", Frequency::Daily, day("2024-01-01")).with_reminder("07:15");
        assert_eq!(habit.reminder_hour_minute().unwrap().unwrap(), (7, 15));
    }

    #[test]
    fn rejects_malformed_days() {
        assert!(parse_day("2024-13-01").is_err());
        assert!(parse_day("yesterday").is_err());
    }

    #[test]
    fn check_in_constructors_set_completed_flag() {
        let d = day("2024-03-01");
        assert!(CheckIn::completed("h1", d).completed);
        assert!(!CheckIn::missed("h1", d).completed);
    }
}
