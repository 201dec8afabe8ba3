//! Store-backed habit workflow.
//!
//! [`Tracker`] ties the pure engines to the key-value store: it loads the
//! relevant keys, runs scoring or the partner, and writes the results back.
//! Every operation is a load-modify-save over whole values, so callers must
//! not run two trackers against the same store at once.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::model::{parse_time_of_day, ChatMessage, Conversation, Habit, User};
use crate::notify::{Inbox, NotificationKind, NotificationScheduler, Trigger};
use crate::partner::{Partner, WeeklyReview};
use crate::scoring::{all_completed_today, PointsBreakdown, ScoringRules};
use crate::stats::HabitStats;
use crate::storage::{Config, Store};

/// Outcome of [`Tracker::complete`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub habit: Habit,
    pub points: PointsBreakdown,
    /// Consistency bonus, when this completion finished the day
    pub daily_bonus: Option<u32>,
    pub events: Vec<Event>,
    /// Balance after crediting, if a user profile exists
    pub balance: Option<u64>,
}

impl CompletionReport {
    pub fn total_points(&self) -> u32 {
        self.points.total().saturating_add(self.daily_bonus.unwrap_or(0))
    }
}

pub struct Tracker<'a> {
    store: &'a Store,
    rules: ScoringRules,
    partner: Partner,
}

impl<'a> Tracker<'a> {
    pub fn new(store: &'a Store, config: &Config) -> Self {
        Self {
            store,
            rules: config.scoring_rules().clone(),
            partner: Partner::with_config(config.partner.clone()),
        }
    }

    pub fn with_defaults(store: &'a Store) -> Self {
        Self::new(store, &Config::default())
    }

    pub fn store(&self) -> &Store {
        self.store
    }

    pub fn partner(&self) -> &Partner {
        &self.partner
    }

    /// Create the user profile and end the first-launch state.
    ///
    /// # Errors
    /// Fails if the name is blank or a profile already exists.
    pub fn init_user(&self, name: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("name".into()).into());
        }
        if self.store.user()?.is_some() {
            return Err(ValidationError::InvalidValue {
                field: "user".into(),
                message: "a profile already exists".into(),
            }
            .into());
        }
        let user = User::new(name);
        self.store.save_user(&user)?;
        self.store.mark_launched()?;
        info!(user_id = %user.id, "user profile created");
        Ok(user)
    }

    /// # Errors
    /// Returns `NotFound` when no profile has been created.
    pub fn user(&self) -> Result<User> {
        self.store.user()?.ok_or_else(|| CoreError::NotFound {
            kind: "user",
            id: "profile".into(),
        })
    }

    pub fn habits(&self) -> Result<Vec<Habit>> {
        self.store.habits()
    }

    /// Persist a new habit.
    ///
    /// # Errors
    /// Rejects blank titles and malformed reminder times.
    pub fn add_habit(&self, habit: Habit) -> Result<Habit> {
        if habit.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title".into()).into());
        }
        if let Some(parsed) = habit.reminder_hour_minute() {
            parsed?;
        }
        let mut habits = self.store.habits()?;
        habits.push(habit.clone());
        self.store.save_habits(&habits)?;
        info!(habit_id = %habit.id, title = %habit.title, "habit added");
        Ok(habit)
    }

    /// Resolve an id, unique id prefix, or exact title (case-insensitive).
    ///
    /// # Errors
    /// `NotFound` when nothing matches, a validation error when a prefix is
    /// ambiguous.
    pub fn find_habit(&self, query: &str) -> Result<Habit> {
        let habits = self.store.habits()?;
        let idx = position(&habits, query)?;
        Ok(habits[idx].clone())
    }

    /// Complete a habit for `today` and apply every side effect.
    ///
    /// Every key is read before anything is written, and the writes share
    /// one transaction: on any error the store is left as it was.
    ///
    /// # Errors
    /// Returns [`CoreError::Completion`] if the day is already recorded, or
    /// a store error if any of the touched keys cannot be read or written.
    pub fn complete(&self, query: &str, today: NaiveDate) -> Result<CompletionReport> {
        let mut habits = self.store.habits()?;
        let idx = position(&habits, query)?;
        let previously_all_completed = all_completed_today(&habits, today);

        let completion = self.rules.complete(&habits[idx], today)?;
        habits[idx] = completion.habit.clone();
        let mut events = completion.events.clone();
        let mut earned = completion.points_earned();

        let bonus = self
            .rules
            .daily_consistency_bonus(&habits, today, previously_all_completed);
        let daily_bonus = bonus.map(|b| {
            earned = earned.saturating_add(b.points);
            events.push(b.event);
            b.points
        });

        let mut check_ins = self.store.check_ins()?;
        check_ins.push(completion.check_in.clone());

        let user = self.store.user()?.map(|mut user| {
            user.credit(earned);
            user.sync_streak(&habits);
            user
        });
        if user.is_none() {
            debug!("no user profile, points not credited");
        }
        let inbox = self.forward_events(&events)?;

        self.store.transaction(|store| {
            if let Some(user) = &user {
                store.save_user(user)?;
            }
            store.save_habits(&habits)?;
            store.save_check_ins(&check_ins)?;
            match &inbox {
                Some(inbox) => store.save_notifications(inbox),
                None => Ok(()),
            }
        })?;
        info!(habit_id = %completion.habit.id, %today, points = earned, "habit completed");

        Ok(CompletionReport {
            habit: completion.habit,
            points: completion.points,
            daily_bonus,
            events,
            balance: user.map(|u| u.virtual_currency),
        })
    }

    /// Schedule notifications for `events` into a loaded inbox, or `None`
    /// when notifications are disabled.
    fn forward_events(&self, events: &[Event]) -> Result<Option<Inbox>> {
        if !self.store.settings()?.notifications_enabled {
            debug!(count = events.len(), "notifications disabled, events dropped");
            return Ok(None);
        }
        let mut inbox = self.store.notifications()?;
        for payload in events.iter().filter_map(Event::notification) {
            inbox.schedule_payload(&payload, Trigger::now())?;
        }
        Ok(Some(inbox))
    }

    /// Stop scheduling a habit while keeping its history.
    pub fn archive(&self, query: &str) -> Result<Habit> {
        let mut habits = self.store.habits()?;
        let idx = position(&habits, query)?;
        let habit = &mut habits[idx];
        habit.active = false;
        habit.updated_at = Utc::now();
        let archived = habit.clone();
        self.store.save_habits(&habits)?;
        info!(habit_id = %archived.id, "habit archived");
        Ok(archived)
    }

    /// Load the conversation, greeting the user if it is empty.
    pub fn open_chat<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Conversation> {
        let mut conversation = self.store.conversation()?;
        if conversation.is_empty() {
            conversation.push(self.partner.welcome(rng));
            self.store.save_conversation(&conversation)?;
        }
        Ok(conversation)
    }

    /// Record a user message and the partner's reply. Returns the reply.
    pub fn send_message<R: Rng + ?Sized>(
        &self,
        text: &str,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<ChatMessage> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyField("message".into()).into());
        }
        let mut conversation = self.open_chat(rng)?;
        let habits = self.store.habits()?;
        conversation.push(ChatMessage::from_user(text));
        let reply = self.partner.respond(text, &habits, today, rng);
        conversation.push(reply.clone());
        self.store.save_conversation(&conversation)?;
        Ok(reply)
    }

    /// Compute the review and post it to the conversation.
    pub fn weekly_review(&self, today: NaiveDate) -> Result<WeeklyReview> {
        let habits = self.store.habits()?;
        let check_ins = self.store.check_ins()?;
        let review = self.partner.weekly_review(&habits, &check_ins, today);
        self.post(review.to_message())?;
        Ok(review)
    }

    pub fn challenge<R: Rng + ?Sized>(&self, today: NaiveDate, rng: &mut R) -> Result<ChatMessage> {
        let habits = self.store.habits()?;
        let message = self.partner.challenge(&habits, today, rng);
        self.post(message.clone())?;
        Ok(message)
    }

    pub fn feedback(&self, query: &str) -> Result<ChatMessage> {
        let habit = self.find_habit(query)?;
        let check_ins = self.store.check_ins()?;
        let message = self.partner.feedback(&habit, &check_ins);
        self.post(message.clone())?;
        Ok(message)
    }

    /// Post a reminder for one habit and schedule it daily.
    ///
    /// Uses the habit's reminder time, or the settings default when unset.
    pub fn remind<R: Rng + ?Sized>(&self, query: &str, rng: &mut R) -> Result<ChatMessage> {
        let habit = self.find_habit(query)?;
        let settings = self.store.settings()?;
        let (hour, minute) = match habit.reminder_hour_minute() {
            Some(parsed) => parsed?,
            None => parse_time_of_day(&settings.reminder_time)?,
        };
        let trigger = Trigger::daily(hour, minute)?;

        let message = self.partner.reminder(&habit, rng);
        self.post(message.clone())?;

        if settings.notifications_enabled {
            let mut inbox = self.store.notifications()?;
            inbox.schedule("Habit Reminder", &message.content, trigger, NotificationKind::Reminder)?;
            self.store.save_notifications(&inbox)?;
        }
        Ok(message)
    }

    pub fn stats(&self, today: NaiveDate) -> Result<HabitStats> {
        Ok(HabitStats::compute(&self.store.habits()?, today))
    }

    fn post(&self, message: ChatMessage) -> Result<()> {
        let mut conversation = self.store.conversation()?;
        conversation.push(message);
        self.store.save_conversation(&conversation)
    }
}

fn position(habits: &[Habit], query: &str) -> Result<usize> {
    let query = query.trim();
    let not_found = || CoreError::NotFound {
        kind: "habit",
        id: query.to_string(),
    };
    if query.is_empty() {
        return Err(not_found());
    }
    if let Some(idx) = habits.iter().position(|h| h.id == query) {
        return Ok(idx);
    }

    let prefixed: Vec<usize> = habits
        .iter()
        .enumerate()
        .filter(|(_, h)| h.id.starts_with(query))
        .map(|(i, _)| i)
        .collect();
    match prefixed.as_slice() {
        [only] => return Ok(*only),
        [] => {}
        _ => {
            return Err(ValidationError::InvalidValue {
                field: "habit".into(),
                message: format!("'{query}' matches {} habits", prefixed.len()),
            }
            .into())
        }
    }

    habits
        .iter()
        .position(|h| h.title.eq_ignore_ascii_case(query))
        .ok_or_else(not_found)
}
