//! Chat transcript between the user and the accountability partner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Assistant,
}

/// Tone of an assistant message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Encouragement,
    Celebration,
    Feedback,
    Reminder,
    Challenge,
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub origin: Origin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_habit_id: Option<String>,
    #[serde(default)]
    pub read: bool,
}

impl ChatMessage {
    /// A message typed by the user. User messages are read by definition.
    pub fn from_user(content: impl Into<String>) -> Self {
        ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            timestamp: Utc::now(),
            origin: Origin::User,
            kind: None,
            related_habit_id: None,
            read: true,
        }
    }

    /// An unread message from the partner.
    pub fn from_assistant(content: impl Into<String>, kind: MessageKind) -> Self {
        ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            timestamp: Utc::now(),
            origin: Origin::Assistant,
            kind: Some(kind),
            related_habit_id: None,
            read: false,
        }
    }

    pub fn related_to(mut self, habit_id: impl Into<String>) -> Self {
        self.related_habit_id = Some(habit_id.into());
        self
    }

    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }
}

/// Append-only ordered transcript.
///
/// Messages are never edited after being pushed; only the `read` flag
/// may flip from false to true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Number of unread assistant messages.
    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.read).count()
    }

    /// Mark one message read. Returns false if no message has that id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.read = true;
                true
            }
            None => false,
        }
    }

    /// Mark every message read.
    pub fn mark_all_read(&mut self) {
        for m in &mut self.messages {
            m.read = true;
        }
    }

    /// The newest `n` messages, oldest first.
    pub fn tail(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_read_assistant_messages_are_not() {
        let user = ChatMessage::from_user("hello");
        let reply = ChatMessage::from_assistant("hi", MessageKind::Feedback);
        assert!(user.is_user());
        assert!(user.read);
        assert!(!reply.is_user());
        assert!(!reply.read);
        assert_eq!(reply.kind, Some(MessageKind::Feedback));
    }

    #[test]
    fn conversation_appends_in_order_and_tracks_unread() {
        let mut convo = Conversation::new();
        convo.push(ChatMessage::from_user("one"));
        let reply = ChatMessage::from_assistant("two", MessageKind::Celebration);
        let reply_id = reply.id.clone();
        convo.push(reply);
        convo.push(ChatMessage::from_assistant("three", MessageKind::Feedback));

        assert_eq!(convo.len(), 3);
        assert_eq!(convo.messages()[0].content, "one");
        assert_eq!(convo.unread_count(), 2);

        assert!(convo.mark_read(&reply_id));
        assert!(!convo.mark_read("missing"));
        assert_eq!(convo.unread_count(), 1);

        convo.mark_all_read();
        assert_eq!(convo.unread_count(), 0);
    }

    #[test]
    fn tail_returns_newest_messages_oldest_first() {
        let mut convo = Conversation::new();
        for i in 0..5 {
            convo.push(ChatMessage::from_user(format!("m{i}")));
        }
        let tail: Vec<_> = convo.tail(2).iter().map(|m| m.content.as_str()).collect();
        assert_eq!(tail, vec!["m3", "m4"]);
        assert_eq!(convo.tail(10).len(), 5);
    }

    #[test]
    fn conversation_serializes_as_plain_array() {
        let mut convo = Conversation::new();
        convo.push(ChatMessage::from_assistant("hi", MessageKind::Encouragement).related_to("h1"));
        let json = serde_json::to_value(&convo).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["origin"], "assistant");
        assert_eq!(json[0]["relatedHabitId"], "h1");
    }
}
