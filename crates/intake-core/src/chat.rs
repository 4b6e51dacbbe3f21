//! Chat-mode scoring: the assistant conversation raises the score by a
//! fixed increment per classified message, capped at 100.
//!
//! Unlike form mode this is order-dependent: sending the same message twice
//! counts twice. The two modes never share a profile.

use crate::attachment::AttachmentDescriptor;
use crate::classifier::{ChatContext, ChatIntent, Classifier};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::guidance;
use crate::profile::RequestProfile;
use crate::rules::default_rules;
use crate::session::SessionContext;
use crate::sink::ProfileSink;
use crate::transcript::{MessageId, Transcript};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the conversation surface renders for one bot reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReply {
    pub display_text: String,
    pub score_delta: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub intent: ChatIntent,
    pub reply: BotReply,
    /// Score after this turn.
    pub score: u8,
}

pub struct ChatFlow {
    profile: RequestProfile,
    transcript: Transcript,
    classifier: Classifier,
    config: EngineConfig,
    session: SessionContext,
}

impl ChatFlow {
    pub fn new(session: SessionContext, config: EngineConfig) -> Self {
        let mut flow = Self {
            profile: RequestProfile::new(),
            transcript: Transcript::new(),
            classifier: Classifier::new(default_rules()),
            config,
            session,
        };
        flow.greet();
        flow
    }

    /// Start at `score` instead of 0, e.g. when replaying a conversation.
    pub fn with_score(mut self, score: u8) -> Self {
        self.profile.completeness = score.min(100);
        self
    }

    pub fn score(&self) -> u8 {
        self.profile.completeness
    }

    pub fn profile(&self) -> &RequestProfile {
        &self.profile
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Classify one user message and update the score.
    ///
    /// Returns `None`, leaving all state unchanged, when there is neither
    /// text nor a well-formed attachment. The bot reply is not added to the
    /// transcript; call [`ChatFlow::deliver`] (or resolve a pending
    /// placeholder) when it should be shown.
    pub fn submit_message(
        &mut self,
        text: &str,
        attachments: Vec<AttachmentDescriptor>,
    ) -> Option<ChatTurn> {
        let attachments: Vec<_> = attachments
            .into_iter()
            .filter(AttachmentDescriptor::is_well_formed)
            .collect();
        if text.trim().is_empty() && attachments.is_empty() {
            tracing::debug!("ignoring empty chat message");
            return None;
        }

        self.transcript.push_user(text, attachments.clone());
        if !text.trim().is_empty() {
            self.profile.conversation_signals.push(text.to_string());
        }

        let classification = {
            let ctx = ChatContext::new(
                text,
                &attachments,
                self.profile.completeness,
                self.profile.conversation_signals.len(),
                &self.config.scoring,
            );
            self.classifier.classify(&ctx)
        };

        self.profile.attachments.extend(attachments);
        self.profile.completeness = classification.score_after;
        self.profile.touch();

        Some(ChatTurn {
            intent: classification.intent,
            reply: BotReply {
                display_text: classification.reply.clone(),
                score_delta: classification.score_delta(),
            },
            score: classification.score_after,
        })
    }

    /// Show a reply immediately.
    pub fn deliver(&mut self, turn: &ChatTurn) -> MessageId {
        self.transcript.push_bot(turn.reply.display_text.clone())
    }

    /// Add a "typing" / "analyzing" placeholder for a deferred reply.
    pub fn begin_pending(&mut self, label: &str) -> MessageId {
        self.transcript.push_placeholder(label)
    }

    /// Replace a placeholder with the deferred reply, or with the configured
    /// failure notice when the reply could not be produced.
    pub fn resolve_pending<E: std::fmt::Display>(
        &mut self,
        id: MessageId,
        outcome: std::result::Result<String, E>,
    ) -> MessageId {
        let notice = self.config.replies.failure_notice.clone();
        self.transcript.resolve(id, outcome, &notice)
    }

    pub fn pending_label(has_attachments: bool) -> &'static str {
        if has_attachments {
            "Analyzing your files..."
        } else {
            "Typing..."
        }
    }

    pub fn reply_delay(&self, has_attachments: bool) -> Duration {
        if has_attachments {
            self.config.replies.analysis_delay()
        } else {
            self.config.replies.typing_delay()
        }
    }

    /// Discard the current request and conversation.
    pub fn start_new(&mut self) {
        self.profile = RequestProfile::new();
        self.transcript = Transcript::new();
        self.greet();
    }

    pub fn submit(&self, sink: &mut dyn ProfileSink) -> Result<()> {
        sink.accept(&self.profile)
    }

    fn greet(&mut self) {
        let text = guidance::welcome(self.session.greeting_name());
        self.transcript.push_bot(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntakeError;
    use crate::scheduler::schedule;
    use crate::transcript::Sender;
    use crate::types::{AccountType, MediaKind};

    fn flow() -> ChatFlow {
        ChatFlow::new(SessionContext::default(), EngineConfig::default())
    }

    fn jpg() -> AttachmentDescriptor {
        AttachmentDescriptor::new("a.jpg", MediaKind::Image, 1000)
    }

    #[test]
    fn starts_with_welcome() {
        let f = flow();
        assert_eq!(f.transcript().len(), 1);
        assert!(f.transcript().messages()[0].content.starts_with("Hi there!"));

        let named = ChatFlow::new(
            SessionContext::new("Dana", AccountType::Buyer),
            EngineConfig::default(),
        );
        assert!(named.transcript().messages()[0].content.starts_with("Hi Dana!"));
    }

    #[test]
    fn plumbing_then_default() {
        let mut f = flow();
        let t = f.submit_message("my pipe is leaking", vec![]).unwrap();
        assert_eq!(t.intent, ChatIntent::Plumbing);
        assert_eq!(t.score, 0);
        assert_eq!(t.reply.score_delta, 0);

        let t = f.submit_message("ok here are more details", vec![]).unwrap();
        assert_eq!(t.intent, ChatIntent::General);
        assert_eq!(t.score, 10);
        assert_eq!(t.reply.score_delta, 10);
        assert_eq!(f.profile().completeness, 10);
    }

    #[test]
    fn attachment_at_ninety_five_caps() {
        let mut f = flow().with_score(95);
        let t = f.submit_message("see photo", vec![jpg()]).unwrap();
        assert_eq!(t.intent, ChatIntent::Attachments);
        assert_eq!(t.score, 100);
        assert_eq!(t.reply.score_delta, 5);
        assert_eq!(f.profile().attachments.len(), 1);
    }

    #[test]
    fn repeated_message_counts_twice() {
        let mut f = flow();
        f.submit_message("details", vec![]);
        f.submit_message("details", vec![]);
        assert_eq!(f.score(), 20);
        assert_eq!(f.profile().conversation_signals.len(), 2);
    }

    #[test]
    fn empty_message_is_noop() {
        let mut f = flow();
        f.submit_message("hello", vec![]);
        let before = f.transcript().len();
        assert!(f.submit_message("   ", vec![]).is_none());
        assert!(f
            .submit_message("", vec![AttachmentDescriptor::new("", MediaKind::Other, 0)])
            .is_none());
        assert_eq!(f.transcript().len(), before);
        assert_eq!(f.score(), 10);
    }

    #[test]
    fn score_never_decreases_or_exceeds_hundred() {
        let mut f = flow();
        let inputs = [
            "urgent", "summary", "more", "find provider", "website", "summarize", "a", "b",
            "c", "d", "e", "f", "g", "h",
        ];
        let mut last = f.score();
        for (i, text) in inputs.iter().enumerate() {
            let files = if i % 4 == 0 { vec![jpg()] } else { vec![] };
            let turn = f.submit_message(text, files).unwrap();
            assert!(turn.score >= last);
            assert!(turn.score <= 100);
            last = turn.score;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn file_only_message_is_not_a_signal() {
        let mut f = flow();
        f.submit_message("", vec![jpg()]).unwrap();
        assert!(f.profile().conversation_signals.is_empty());
        assert_eq!(f.score(), 25);
    }

    #[test]
    fn deliver_and_pending_protocol() {
        let mut f = flow();
        let turn = f.submit_message("hello", vec![]).unwrap();
        let ph = f.begin_pending(ChatFlow::pending_label(false));
        assert!(f.transcript().has_pending());
        f.resolve_pending::<String>(ph, Ok(turn.reply.display_text.clone()));
        assert!(!f.transcript().has_pending());
        let last = f.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.content, turn.reply.display_text);

        let ph = f.begin_pending("Typing...");
        f.resolve_pending(ph, Err("boom"));
        assert_eq!(
            f.transcript().last().unwrap().content,
            EngineConfig::default().replies.failure_notice
        );

        f.deliver(&turn);
        assert_eq!(f.transcript().last().unwrap().content, turn.reply.display_text);
    }

    #[tokio::test(start_paused = true)]
    async fn panicked_reply_task_leaves_failure_notice() {
        let mut f = flow();
        let turn = f.submit_message("need help moving a piano", vec![]).unwrap();
        let ph = f.begin_pending(ChatFlow::pending_label(false));

        assert!(!turn.reply.display_text.is_empty());
        let task = schedule(f.reply_delay(false), || -> String {
            panic!("reply generator unavailable")
        });
        let outcome = task.wait().await;
        assert!(matches!(outcome, Err(IntakeError::TaskFailed(_))));
        f.resolve_pending(ph, outcome);

        assert!(!f.transcript().has_pending());
        let last = f.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.content, EngineConfig::default().replies.failure_notice);
        assert!(f
            .transcript()
            .messages()
            .iter()
            .all(|m| m.content != "Typing..."));
        assert_eq!(f.score(), 10);
    }

    #[test]
    fn reply_delay_depends_on_files() {
        let f = flow();
        assert_eq!(f.reply_delay(true), Duration::from_millis(2000));
        assert_eq!(f.reply_delay(false), Duration::from_millis(1500));
    }

    #[test]
    fn start_new_resets_score_and_transcript() {
        let mut f = flow();
        f.submit_message("details", vec![jpg()]);
        let old = f.profile().id;
        f.start_new();
        assert_eq!(f.score(), 0);
        assert_eq!(f.transcript().len(), 1);
        assert_ne!(f.profile().id, old);
    }
}
