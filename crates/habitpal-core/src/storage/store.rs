//! SQLite-backed key-value store.
//!
//! Every value is a JSON string under one of a fixed set of keys, the same
//! layout the mobile client keeps in its local storage:
//!
//! | Key             | Value                         |
//! |-----------------|-------------------------------|
//! | `user`          | [`User`] object               |
//! | `habits`        | array of [`Habit`]            |
//! | `checkIns`      | array of [`CheckIn`]          |
//! | `conversation`  | array of chat messages        |
//! | `settings`      | [`Settings`] object           |
//! | `notifications` | array of notifications        |
//! | `isFirstLaunch` | `"false"` once onboarded      |
//! | `isDarkMode`    | `true` / `false`              |

use std::fmt;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::data_dir;
use crate::error::{Result, StoreError};
use crate::model::{CheckIn, Conversation, Habit, Settings, User};
use crate::notify::Inbox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    User,
    Habits,
    CheckIns,
    Conversation,
    Settings,
    Notifications,
    IsFirstLaunch,
    IsDarkMode,
}

impl StoreKey {
    pub const ALL: [StoreKey; 8] = [
        StoreKey::User,
        StoreKey::Habits,
        StoreKey::CheckIns,
        StoreKey::Conversation,
        StoreKey::Settings,
        StoreKey::Notifications,
        StoreKey::IsFirstLaunch,
        StoreKey::IsDarkMode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::User => "user",
            StoreKey::Habits => "habits",
            StoreKey::CheckIns => "checkIns",
            StoreKey::Conversation => "conversation",
            StoreKey::Settings => "settings",
            StoreKey::Notifications => "notifications",
            StoreKey::IsFirstLaunch => "isFirstLaunch",
            StoreKey::IsDarkMode => "isDarkMode",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value store for application state.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `~/.config/habitpal/habitpal.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("habitpal.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Raw JSON string stored under `key`.
    pub fn get_raw(&self, key: StoreKey) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_raw(&self, key: StoreKey, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    /// Decode the value under `key`.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidValue`] if the stored JSON does not match `T`.
    pub fn get<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                StoreError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                }
                .into()
            }),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }

    pub fn user(&self) -> Result<Option<User>> {
        self.get(StoreKey::User)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.set(StoreKey::User, user)
    }

    pub fn habits(&self) -> Result<Vec<Habit>> {
        Ok(self.get(StoreKey::Habits)?.unwrap_or_default())
    }

    pub fn save_habits(&self, habits: &[Habit]) -> Result<()> {
        self.set(StoreKey::Habits, habits)
    }

    pub fn check_ins(&self) -> Result<Vec<CheckIn>> {
        Ok(self.get(StoreKey::CheckIns)?.unwrap_or_default())
    }

    pub fn save_check_ins(&self, check_ins: &[CheckIn]) -> Result<()> {
        self.set(StoreKey::CheckIns, check_ins)
    }

    pub fn conversation(&self) -> Result<Conversation> {
        Ok(self.get(StoreKey::Conversation)?.unwrap_or_default())
    }

    pub fn save_conversation(&self, conversation: &Conversation) -> Result<()> {
        self.set(StoreKey::Conversation, conversation)
    }

    pub fn settings(&self) -> Result<Settings> {
        Ok(self.get(StoreKey::Settings)?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.set(StoreKey::Settings, settings)
    }

    pub fn notifications(&self) -> Result<Inbox> {
        Ok(self.get(StoreKey::Notifications)?.unwrap_or_default())
    }

    pub fn save_notifications(&self, inbox: &Inbox) -> Result<()> {
        self.set(StoreKey::Notifications, inbox)
    }

    /// True until [`Store::mark_launched`] has been called.
    pub fn is_first_launch(&self) -> Result<bool> {
        Ok(self.get_raw(StoreKey::IsFirstLaunch)?.is_none())
    }

    pub fn mark_launched(&self) -> Result<()> {
        self.set_raw(StoreKey::IsFirstLaunch, "false")
    }

    /// Stored theme flag; unreadable values count as light mode.
    pub fn is_dark_mode(&self) -> Result<bool> {
        match self.get::<bool>(StoreKey::IsDarkMode) {
            Ok(flag) => Ok(flag.unwrap_or(false)),
            Err(e) => {
                warn!("ignoring unreadable isDarkMode value: {e}");
                Ok(false)
            }
        }
    }

    pub fn set_dark_mode(&self, dark: bool) -> Result<()> {
        self.set(StoreKey::IsDarkMode, &dark)
    }

    /// Run `f` inside one SQLite transaction.
    ///
    /// Every write made through the store in `f` is committed together, or
    /// rolled back if `f` returns an error.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let out = f(self)?;
        tx.commit()?;
        Ok(out)
    }

    /// Remove every key.
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::model::{ChatMessage, Frequency, MessageKind, Theme};
    use chrono::NaiveDate;

    #[test]
    fn missing_keys_load_as_defaults() {
        let store = Store::open_memory().unwrap();
        assert!(store.user().unwrap().is_none());
        assert!(store.habits().unwrap().is_empty());
        assert!(store.check_ins().unwrap().is_empty());
        assert!(store.conversation().unwrap().is_empty());
        assert_eq!(store.settings().unwrap(), Settings::default());
        assert!(store.notifications().unwrap().items().is_empty());
        assert!(!store.is_dark_mode().unwrap());
    }

    #[test]
    fn habits_round_trip() {
        let store = Store::open_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let habits = vec![
            Habit::new("Read", "learning", Frequency::Daily, start),
            Habit::new("Run", "health", Frequency::Weekly, start),
        ];
        store.save_habits(&habits).unwrap();
        assert_eq!(store.habits().unwrap(), habits);

        let raw = store.get_raw(StoreKey::Habits).unwrap().unwrap();
        assert!(raw.contains("\"streakCount\":0"));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = Store::open_memory().unwrap();
        let mut user = User::new("Ada");
        store.save_user(&user).unwrap();
        user.credit(25);
        store.save_user(&user).unwrap();
        assert_eq!(store.user().unwrap().unwrap().virtual_currency, 25);
    }

    #[test]
    fn conversation_and_settings_persist() {
        let store = Store::open_memory().unwrap();
        let mut convo = Conversation::new();
        convo.push(ChatMessage::from_user("hi"));
        convo.push(ChatMessage::from_assistant("hello", MessageKind::Feedback));
        store.save_conversation(&convo).unwrap();
        assert_eq!(store.conversation().unwrap().len(), 2);

        let settings = Settings {
            theme: Theme::Dark,
            ..Default::default()
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.settings().unwrap().theme, Theme::Dark);
    }

    #[test]
    fn first_launch_flag() {
        let store = Store::open_memory().unwrap();
        assert!(store.is_first_launch().unwrap());
        store.mark_launched().unwrap();
        assert!(!store.is_first_launch().unwrap());
        assert_eq!(
            store.get_raw(StoreKey::IsFirstLaunch).unwrap().as_deref(),
            Some("false")
        );
    }

    #[test]
    fn corrupt_list_is_an_error() {
        let store = Store::open_memory().unwrap();
        store.set_raw(StoreKey::Habits, "{not json").unwrap();
        let err = store.habits().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Store(StoreError::InvalidValue { ref key, .. }) if key == "habits"
        ));
    }

    #[test]
    fn corrupt_dark_mode_falls_back_to_light() {
        let store = Store::open_memory().unwrap();
        store.set_raw(StoreKey::IsDarkMode, "maybe").unwrap();
        assert!(!store.is_dark_mode().unwrap());
        store.set_dark_mode(true).unwrap();
        assert!(store.is_dark_mode().unwrap());
    }

    #[test]
    fn clear_resets_first_launch() {
        let store = Store::open_memory().unwrap();
        store.save_user(&User::new("Ada")).unwrap();
        store.mark_launched().unwrap();
        store.clear().unwrap();
        assert!(store.user().unwrap().is_none());
        assert!(store.is_first_launch().unwrap());
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let store = Store::open_memory().unwrap();
        store.save_user(&User::new("Ada")).unwrap();

        let result: Result<()> = store.transaction(|s| {
            let mut user = s.user()?.unwrap();
            user.credit(50);
            s.save_user(&user)?;
            s.mark_launched()?;
            Err(StoreError::QueryFailed("boom".into()).into())
        });
        assert!(result.is_err());
        assert_eq!(store.user().unwrap().unwrap().virtual_currency, 0);
        assert!(store.is_first_launch().unwrap());

        store.transaction(|s| s.set_dark_mode(true)).unwrap();
        assert!(store.is_dark_mode().unwrap());
    }

    #[test]
    fn key_names_match_client_layout() {
        let names: Vec<_> = StoreKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "user",
                "habits",
                "checkIns",
                "conversation",
                "settings",
                "notifications",
                "isFirstLaunch",
                "isDarkMode"
            ]
        );
    }

    #[test]
    fn open_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habitpal.db");
        {
            let store = Store::open_at(&path).unwrap();
            store.mark_launched().unwrap();
        }
        let reopened = Store::open_at(&path).unwrap();
        assert!(!reopened.is_first_launch().unwrap());
    }
}
