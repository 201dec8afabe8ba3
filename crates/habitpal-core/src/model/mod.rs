//! Plain records shared by the scoring engine, the partner and storage.
//!
//! JSON field names are camelCase so stored values stay readable by the
//! mobile client that shares the same store layout.

mod habit;
mod message;
mod user;

pub use habit::{parse_day, parse_time_of_day, CheckIn, Frequency, Habit, Priority};
pub use message::{ChatMessage, Conversation, MessageKind, Origin};
pub use user::{Settings, Theme, User};
