use crate::attachment::AttachmentDescriptor;
use crate::config::ScoringConfig;
use crate::guidance;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ChatIntent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    Attachments,
    Emergency,
    Plumbing,
    Development,
    Summary,
    FindMatches,
    General,
}

impl ChatIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatIntent::Attachments => "attachments",
            ChatIntent::Emergency => "emergency",
            ChatIntent::Plumbing => "plumbing",
            ChatIntent::Development => "development",
            ChatIntent::Summary => "summary",
            ChatIntent::FindMatches => "find_matches",
            ChatIntent::General => "general",
        }
    }
}

impl fmt::Display for ChatIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChatContext
// ---------------------------------------------------------------------------

pub struct ChatContext<'a> {
    /// Message as typed.
    pub text: &'a str,
    /// Lower-cased copy used for keyword matching.
    pub lowered: String,
    pub attachments: &'a [AttachmentDescriptor],
    /// Score before this message.
    pub score: u8,
    /// Free-text messages collected so far, including this one.
    pub signal_count: usize,
    pub scoring: &'a ScoringConfig,
}

impl<'a> ChatContext<'a> {
    pub fn new(
        text: &'a str,
        attachments: &'a [AttachmentDescriptor],
        score: u8,
        signal_count: usize,
        scoring: &'a ScoringConfig,
    ) -> Self {
        Self {
            text,
            lowered: text.to_lowercase(),
            attachments,
            score,
            signal_count,
            scoring,
        }
    }

    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.lowered.contains(k))
    }
}

// ---------------------------------------------------------------------------
// Classification (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub rule_id: String,
    pub intent: ChatIntent,
    pub score_before: u8,
    pub score_after: u8,
    pub reply: String,
}

impl Classification {
    pub fn score_delta(&self) -> u8 {
        self.score_after - self.score_before
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A fn-pointer rule. `message` receives the score after the increment.
pub struct Rule {
    pub id: &'static str,
    pub intent: ChatIntent,
    pub condition: fn(&ChatContext) -> bool,
    pub increment: fn(&ChatContext) -> u8,
    pub message: fn(&ChatContext, u8) -> String,
}

fn apply_increment(score: u8, increment: u8) -> u8 {
    score.saturating_add(increment).min(100)
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Priority-ordered: the first rule whose condition holds decides the turn.
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id).collect()
    }

    pub fn classify(&self, ctx: &ChatContext) -> Classification {
        let score_before = ctx.score.min(100);
        for rule in &self.rules {
            if (rule.condition)(ctx) {
                let score_after = apply_increment(score_before, (rule.increment)(ctx));
                tracing::debug!(rule = rule.id, score_before, score_after, "classified chat message");
                return Classification {
                    rule_id: rule.id.to_string(),
                    intent: rule.intent,
                    score_before,
                    score_after,
                    reply: (rule.message)(ctx, score_after),
                };
            }
        }

        // Fallback: general information, small bump
        let score_after = apply_increment(score_before, ctx.scoring.default_increment);
        tracing::debug!(rule = "general", score_before, score_after, "classified chat message");
        Classification {
            rule_id: "general".to_string(),
            intent: ChatIntent::General,
            score_before,
            score_after,
            reply: guidance::general_reply(score_after),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
