//! Notification payloads and the scheduler boundary.
//!
//! The core never delivers notifications itself. It turns scoring events
//! into [`NotificationPayload`]s and hands them to a [`NotificationScheduler`]
//! supplied by the caller. [`Inbox`] is the in-process scheduler used by the
//! CLI: it records every scheduled notification into a newest-first list
//! that is persisted under the `notifications` store key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reminder,
    Streak,
    Achievement,
    Message,
    System,
}

impl Default for NotificationKind {
    fn default() -> Self {
        NotificationKind::Reminder
    }
}

/// When a scheduled notification should fire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Fire once after a relative delay.
    Delay { seconds: u64 },
    /// Fire every day at a local time of day.
    Daily { hour: u32, minute: u32 },
}

impl Trigger {
    pub fn now() -> Self {
        Trigger::Delay { seconds: 0 }
    }

    /// Daily trigger at `hour:minute`.
    ///
    /// # Errors
    /// Returns an error if the time of day is out of range.
    pub fn daily(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Trigger::Daily { hour, minute })
    }
}

/// Content of a notification before it is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
}

/// A notification as recorded in the user's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

/// Delivery boundary for notifications.
pub trait NotificationScheduler {
    /// Schedule a notification and return its identifier.
    ///
    /// # Errors
    /// Implementations return an error if the notification cannot be queued.
    fn schedule(
        &mut self,
        title: &str,
        body: &str,
        trigger: Trigger,
        kind: NotificationKind,
    ) -> Result<String>;

    /// Schedule a payload produced by the core.
    ///
    /// # Errors
    /// Propagates errors from [`NotificationScheduler::schedule`].
    fn schedule_payload(&mut self, payload: &NotificationPayload, trigger: Trigger) -> Result<String> {
        self.schedule(&payload.title, &payload.body, trigger, payload.kind)
    }
}

/// Newest-first list of recorded notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inbox {
    items: Vec<Notification>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Prepend a notification.
    pub fn add(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    /// Returns false if no notification has that id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    /// Resolve a full id or a unique id prefix to the notification's id.
    ///
    /// # Errors
    /// `NotFound` when the query is blank or nothing matches, a validation
    /// error when a prefix matches more than one notification.
    pub fn resolve_id(&self, query: &str) -> Result<String> {
        let query = query.trim();
        let not_found = || CoreError::NotFound {
            kind: "notification",
            id: query.to_string(),
        };
        if query.is_empty() {
            return Err(not_found());
        }
        if let Some(n) = self.items.iter().find(|n| n.id == query) {
            return Ok(n.id.clone());
        }
        let matches: Vec<&Notification> = self
            .items
            .iter()
            .filter(|n| n.id.starts_with(query))
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.id.clone()),
            [] => Err(not_found()),
            _ => Err(ValidationError::InvalidValue {
                field: "notification".into(),
                message: format!("'{query}' matches {} notifications", matches.len()),
            }
            .into()),
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl NotificationScheduler for Inbox {
    fn schedule(
        &mut self,
        title: &str,
        body: &str,
        trigger: Trigger,
        kind: NotificationKind,
    ) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.add(Notification {
            id: id.clone(),
            title: title.to_string(),
            body: body.to_string(),
            timestamp: Utc::now(),
            read: false,
            kind,
            trigger: Some(trigger),
        });
        Ok(id)
    }
}
