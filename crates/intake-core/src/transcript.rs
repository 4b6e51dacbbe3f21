use crate::attachment::AttachmentDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MessageId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
    /// The other party in a buyer/provider conversation.
    Counterpart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentDescriptor>,
    pub timestamp: DateTime<Utc>,
    /// Placeholder awaiting a deferred reply ("typing", "analyzing files").
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pending: bool,
}

impl Message {
    fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            content: content.into(),
            attachments: Vec::new(),
            timestamp: Utc::now(),
            pending: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push_user(
        &mut self,
        content: impl Into<String>,
        attachments: Vec<AttachmentDescriptor>,
    ) -> MessageId {
        let mut msg = Message::new(Sender::User, content);
        msg.attachments = attachments;
        self.push(msg)
    }

    pub fn push_bot(&mut self, content: impl Into<String>) -> MessageId {
        self.push(Message::new(Sender::Bot, content))
    }

    pub fn push_counterpart(&mut self, content: impl Into<String>) -> MessageId {
        self.push(Message::new(Sender::Counterpart, content))
    }

    pub fn push_placeholder(&mut self, content: impl Into<String>) -> MessageId {
        let mut msg = Message::new(Sender::Bot, content);
        msg.pending = true;
        self.push(msg)
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(|m| m.pending)
    }

    /// Replace placeholder `id` with the outcome of the deferred reply.
    ///
    /// On failure the placeholder is dropped and `failure_notice` appended.
    /// There is no retry.
    pub fn resolve<E: std::fmt::Display>(
        &mut self,
        id: MessageId,
        outcome: Result<String, E>,
        failure_notice: &str,
    ) -> MessageId {
        self.resolve_as(id, Sender::Bot, outcome, failure_notice)
    }

    /// Like [`Transcript::resolve`], but a successful reply is attributed to
    /// `sender`. The failure notice always comes from the bot.
    pub fn resolve_as<E: std::fmt::Display>(
        &mut self,
        id: MessageId,
        sender: Sender,
        outcome: Result<String, E>,
        failure_notice: &str,
    ) -> MessageId {
        self.messages.retain(|m| !(m.id == id && m.pending));
        match outcome {
            Ok(text) => self.push(Message::new(sender, text)),
            Err(e) => {
                tracing::warn!(placeholder = %id, error = %e, "deferred reply failed");
                self.push_bot(failure_notice)
            }
        }
    }

    fn push(&mut self, msg: Message) -> MessageId {
        let id = msg.id;
        self.messages.push(msg);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTICE: &str = "Sorry, I couldn't generate a response right now.";

    #[test]
    fn resolve_success_replaces_placeholder() {
        let mut t = Transcript::new();
        t.push_user("hello", vec![]);
        let ph = t.push_placeholder("Generating suggestions...");
        assert!(t.has_pending());

        t.resolve::<String>(ph, Ok("Here you go".to_string()), NOTICE);
        assert!(!t.has_pending());
        assert_eq!(t.len(), 2);
        let last = t.last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.content, "Here you go");
    }

    #[test]
    fn resolve_failure_appends_fixed_notice() {
        let mut t = Transcript::new();
        let ph = t.push_placeholder("Analyzing your files...");
        t.resolve::<&str>(ph, Err("backend down"), NOTICE);
        assert_eq!(t.len(), 1);
        assert_eq!(t.last().unwrap().content, NOTICE);
        assert!(!t.last().unwrap().pending);
    }

    #[test]
    fn resolve_unknown_id_still_appends() {
        let mut t = Transcript::new();
        t.push_bot("welcome");
        t.resolve::<String>(Uuid::new_v4(), Ok("late".to_string()), NOTICE);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn resolve_does_not_remove_non_pending_message_with_same_id() {
        let mut t = Transcript::new();
        let id = t.push_bot("kept");
        t.resolve::<String>(id, Ok("reply".to_string()), NOTICE);
        assert_eq!(t.len(), 2);
        assert_eq!(t.messages()[0].content, "kept");
    }

    #[test]
    fn user_message_keeps_attachments() {
        use crate::types::MediaKind;
        let mut t = Transcript::new();
        t.push_user(
            "",
            vec![AttachmentDescriptor::new("a.jpg", MediaKind::Image, 1)],
        );
        assert_eq!(t.messages()[0].attachments.len(), 1);
    }

    #[test]
    fn resolve_as_attributes_reply_but_not_notice() {
        let mut t = Transcript::new();
        let ph = t.push_placeholder("MoveMasters is typing...");
        t.resolve_as::<String>(ph, Sender::Counterpart, Ok("See you at 2".to_string()), NOTICE);
        assert_eq!(t.len(), 1);
        assert_eq!(t.last().unwrap().sender, Sender::Counterpart);

        let ph = t.push_placeholder("MoveMasters is typing...");
        t.resolve_as(ph, Sender::Counterpart, Err("gone"), NOTICE);
        assert_eq!(t.len(), 2);
        assert_eq!(t.last().unwrap().sender, Sender::Bot);
        assert_eq!(t.last().unwrap().content, NOTICE);
    }
}
