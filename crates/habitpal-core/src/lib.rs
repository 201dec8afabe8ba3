//! # Habitpal Core Library
//!
//! This library provides the core business logic for the Habitpal habit
//! tracker. Every operation is available through the standalone `habitpal`
//! CLI, which is a thin front end over this crate.
//!
//! ## Architecture
//!
//! - **Scoring Engine**: pure point, streak and milestone arithmetic applied
//!   when a habit is completed, plus the daily consistency bonus
//! - **Partner**: a rule-based accountability partner that classifies chat
//!   messages by keyword and answers from fixed template pools
//! - **Storage**: a SQLite-backed key-value store for app data and a
//!   TOML-based configuration for tuning
//! - **Notifications**: scoring events become payloads for a caller-supplied
//!   scheduler
//!
//! ## Key Components
//!
//! - [`ScoringRules`]: point economy and the completion operation
//! - [`Partner`]: response selection and partner-initiated messages
//! - [`Store`]: persistence of habits, check-ins, conversation and settings
//! - [`Tracker`]: the store-backed workflow used by the CLI

pub mod error;
pub mod events;
pub mod model;
pub mod notify;
pub mod partner;
pub mod scoring;
pub mod stats;
pub mod storage;
pub mod tracker;

pub use error::{CompletionError, ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use model::{ChatMessage, CheckIn, Conversation, Frequency, Habit, MessageKind, Priority, Settings, User};
pub use notify::{Inbox, Notification, NotificationKind, NotificationScheduler, Trigger};
pub use partner::{Partner, PartnerConfig, WeeklyReview};
pub use scoring::{complete_habit, daily_consistency_bonus, Completion, PointsBreakdown, ScoringRules};
pub use stats::HabitStats;
pub use storage::{data_dir, Config, Store, StoreKey};
pub use tracker::{CompletionReport, Tracker};
