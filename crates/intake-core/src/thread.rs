//! Buyer/provider conversation threads.
//!
//! A user message is answered by the other party after
//! `replies.counterpart_delay`, and the user can ask for a reply suggestion
//! at any point. Both replies are deferred: the caller shows a placeholder,
//! runs the reply through the scheduler, and resolves the placeholder with
//! whatever came back.

use crate::catalog::Conversation;
use crate::config::EngineConfig;
use crate::error::{IntakeError, Result};
use crate::guidance;
use crate::transcript::{MessageId, Sender, Transcript};

pub const SUGGESTION_LABEL: &str = "Generating conversation suggestions...";

/// Everything needed to build a reply suggestion, detached from the flow
/// so it can move into a scheduled task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub counterpart: String,
    pub last_message: Option<String>,
    pub request_title: String,
}

impl SuggestionRequest {
    /// Fails when the other party has not written anything yet.
    pub fn suggest(&self) -> Result<String> {
        let last = self
            .last_message
            .as_deref()
            .ok_or_else(|| IntakeError::NothingToRespondTo(self.counterpart.clone()))?;
        Ok(guidance::reply_suggestion(last, &self.request_title))
    }
}

pub struct ThreadFlow {
    conversation: Conversation,
    transcript: Transcript,
    config: EngineConfig,
}

impl ThreadFlow {
    pub fn new(conversation: Conversation, config: EngineConfig) -> Self {
        let mut transcript = Transcript::new();
        if !conversation.last_message.trim().is_empty() {
            transcript.push_counterpart(conversation.last_message.clone());
        }
        Self {
            conversation,
            transcript,
            config,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Append a user message. Blank text is ignored.
    pub fn send(&mut self, text: &str) -> Option<MessageId> {
        if text.trim().is_empty() {
            tracing::debug!("ignoring empty thread message");
            return None;
        }
        Some(self.transcript.push_user(text, Vec::new()))
    }

    pub fn typing_label(&self) -> String {
        format!("{} is typing...", self.conversation.provider.name)
    }

    pub fn begin_counterpart_reply(&mut self) -> MessageId {
        let label = self.typing_label();
        self.transcript.push_placeholder(label)
    }

    pub fn counterpart_reply(&self) -> String {
        guidance::counterpart_reply(&self.conversation.request.title)
    }

    pub fn resolve_counterpart<E: std::fmt::Display>(
        &mut self,
        id: MessageId,
        outcome: std::result::Result<String, E>,
    ) -> MessageId {
        let notice = self.config.replies.failure_notice.clone();
        self.transcript
            .resolve_as(id, Sender::Counterpart, outcome, &notice)
    }

    pub fn begin_suggestion(&mut self) -> MessageId {
        self.transcript.push_placeholder(SUGGESTION_LABEL)
    }

    /// Snapshot of the thread for [`SuggestionRequest::suggest`].
    pub fn suggestion_request(&self) -> SuggestionRequest {
        let last_message = self
            .transcript
            .messages()
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Counterpart && !m.pending)
            .map(|m| m.content.clone());
        SuggestionRequest {
            counterpart: self.conversation.provider.name.clone(),
            last_message,
            request_title: self.conversation.request.title.clone(),
        }
    }

    /// Replace the suggestion placeholder with the suggestion, or with
    /// `replies.suggestion_failure_notice`.
    pub fn resolve_suggestion<E: std::fmt::Display>(
        &mut self,
        id: MessageId,
        outcome: std::result::Result<String, E>,
    ) -> MessageId {
        let notice = self.config.replies.suggestion_failure_notice.clone();
        self.transcript.resolve(id, outcome, &notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::scheduler::schedule;
    use std::time::Duration;

    fn thread(id: &str) -> ThreadFlow {
        let catalog = Catalog::demo().unwrap();
        let conversation = catalog.conversation(id).unwrap().clone();
        ThreadFlow::new(conversation, EngineConfig::default())
    }

    fn empty_thread() -> ThreadFlow {
        let mut conversation = Catalog::demo().unwrap().conversations[2].clone();
        conversation.last_message = String::new();
        ThreadFlow::new(conversation, EngineConfig::default())
    }

    #[test]
    fn seeded_with_last_provider_message() {
        let t = thread("1");
        assert_eq!(t.transcript().len(), 1);
        assert_eq!(t.transcript().messages()[0].sender, Sender::Counterpart);
        assert!(empty_thread().transcript().is_empty());
    }

    #[test]
    fn blank_message_is_ignored() {
        let mut t = thread("1");
        assert!(t.send("   ").is_none());
        assert_eq!(t.transcript().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn counterpart_answers_after_delay() {
        let mut t = thread("3");
        t.send("Saturday works, see you at 9").unwrap();
        let ph = t.begin_counterpart_reply();
        assert_eq!(t.transcript().last().unwrap().content, "MoveMasters is typing...");

        let reply = t.counterpart_reply();
        let delay = t.config().replies.counterpart_delay();
        let outcome = schedule(delay, move || reply).wait().await;
        t.resolve_counterpart(ph, outcome);

        let last = t.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Counterpart);
        assert!(last.content.contains("Apartment Move"));
        assert!(!t.transcript().has_pending());
        assert_eq!(t.transcript().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn suggestion_replaces_placeholder() {
        let mut t = thread("1");
        let ph = t.begin_suggestion();
        let request = t.suggestion_request();
        let delay = t.config().replies.suggestion_delay();
        let outcome = schedule(delay, move || request.suggest())
            .wait()
            .await
            .and_then(|r| r);
        t.resolve_suggestion(ph, outcome);

        assert!(!t.transcript().has_pending());
        let last = t.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert!(last.content.starts_with("Suggestion: Confirm the time"));
    }

    #[tokio::test]
    async fn suggestion_without_provider_message_shows_notice() {
        let mut t = empty_thread();
        t.send("Hello, are you available next week?").unwrap();
        let ph = t.begin_suggestion();
        let request = t.suggestion_request();
        let outcome = schedule(Duration::ZERO, move || request.suggest())
            .wait()
            .await
            .and_then(|r| r);
        assert!(matches!(outcome, Err(IntakeError::NothingToRespondTo(_))));
        t.resolve_suggestion(ph, outcome);

        assert!(!t.transcript().has_pending());
        assert_eq!(
            t.transcript().last().unwrap().content,
            "Sorry, I couldn't generate a suggestion right now."
        );
    }

    #[tokio::test]
    async fn panicked_suggestion_shows_notice() {
        let mut t = thread("2");
        let ph = t.begin_suggestion();
        let outcome = schedule(Duration::ZERO, || -> Result<String> {
            panic!("suggestion backend crashed")
        })
        .wait()
        .await
        .and_then(|r| r);
        t.resolve_suggestion(ph, outcome);

        let messages = t.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.content != SUGGESTION_LABEL));
        assert_eq!(
            messages[1].content,
            t.config().replies.suggestion_failure_notice
        );
    }

    #[test]
    fn suggestion_uses_latest_provider_message() {
        let mut t = thread("1");
        let ph = t.begin_counterpart_reply();
        t.resolve_counterpart::<String>(ph, Ok("Which floor is the apartment on?".to_string()));
        let req = t.suggestion_request();
        assert_eq!(
            req.last_message.as_deref(),
            Some("Which floor is the apartment on?")
        );
        assert!(req.suggest().unwrap().contains("Answer their question"));
    }
}
