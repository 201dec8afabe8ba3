//! Keyword classification of user chat messages.

use serde::{Deserialize, Serialize};

use crate::model::MessageKind;

/// What a user message is asking for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    Encouragement,
    Celebration,
    Advice,
    GoalSetting,
    Generic,
}

impl ResponseCategory {
    /// Tone tag attached to the reply.
    pub fn message_kind(self) -> MessageKind {
        match self {
            ResponseCategory::Encouragement => MessageKind::Encouragement,
            ResponseCategory::Celebration => MessageKind::Celebration,
            ResponseCategory::Advice | ResponseCategory::GoalSetting | ResponseCategory::Generic => {
                MessageKind::Feedback
            }
        }
    }
}

/// Checked in order; the first rule with a matching keyword wins.
const RULES: &[(ResponseCategory, &[&str])] = &[
    (ResponseCategory::Encouragement, &["tired", "exhausted", "can't do it"]),
    (ResponseCategory::Celebration, &["completed", "finished", "done"]),
    (ResponseCategory::Advice, &["help", "advice", "suggestion"]),
    (ResponseCategory::GoalSetting, &["goal", "target", "objective"]),
];

/// Classify a message by case-insensitive substring match.
pub fn classify(text: &str) -> ResponseCategory {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(ResponseCategory::Generic)
}
