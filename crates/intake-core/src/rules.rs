use crate::classifier::{ChatContext, ChatIntent, Rule};
use crate::guidance;

// ---------------------------------------------------------------------------
// Helper macro for concise rule definitions
// ---------------------------------------------------------------------------

macro_rules! rule {
    (
        id: $id:expr,
        intent: $intent:expr,
        condition: $cond:expr,
        message: $msg:expr
        $(, increment: $inc:expr)?
    ) => {
        Rule {
            id: $id,
            intent: $intent,
            condition: $cond,
            message: $msg,
            increment: {
                #[allow(unused_assignments, unused_mut)]
                let mut v: fn(&ChatContext) -> u8 = |_| 0;
                $(v = $inc;)?
                v
            },
        }
    };
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

const EMERGENCY: &[&str] = &["emergency", "urgent"];
const PLUMBING: &[&str] = &["plumb", "leak", "pipe"];
const DEVELOPMENT: &[&str] = &["website", "app", "develop"];
const SUMMARY: &[&str] = &["summarize", "summary"];
const FIND_MATCHES: &[&str] = &["match", "find provider", "find service"];

fn has_attachments(ctx: &ChatContext) -> bool {
    !ctx.attachments.is_empty()
}

// ---------------------------------------------------------------------------
// Default rules (priority-ordered)
// ---------------------------------------------------------------------------

/// Chat-mode rules. Anything no rule claims falls through to the
/// classifier's general branch.
pub fn default_rules() -> Vec<Rule> {
    vec![
        // 1. Files outrank any text sent with them
        rule! {
            id: "attachments",
            intent: ChatIntent::Attachments,
            condition: has_attachments,
            message: |ctx, score| guidance::attachments_reply(ctx.attachments, ctx.text, score, ctx.scoring),
            increment: |ctx| ctx.scoring.attachment_increment
        },
        // 2. Urgent requests: ask for location, nature, requirements
        rule! {
            id: "emergency",
            intent: ChatIntent::Emergency,
            condition: |ctx| ctx.mentions_any(EMERGENCY),
            message: |_, _| guidance::emergency_reply()
        },
        // 3. Plumbing follow-up
        rule! {
            id: "plumbing",
            intent: ChatIntent::Plumbing,
            condition: |ctx| ctx.mentions_any(PLUMBING),
            message: |_, _| guidance::plumbing_reply()
        },
        // 4. Development follow-up
        rule! {
            id: "development",
            intent: ChatIntent::Development,
            condition: |ctx| ctx.mentions_any(DEVELOPMENT),
            message: |_, _| guidance::development_reply()
        },
        // 5. Summary request
        rule! {
            id: "summary",
            intent: ChatIntent::Summary,
            condition: |ctx| ctx.mentions_any(SUMMARY),
            message: |ctx, score| guidance::summary_reply(ctx.score, score, ctx.signal_count, ctx.scoring),
            increment: |ctx| ctx.scoring.summary_increment
        },
        // 6. Match request: reports candidates, no increment
        rule! {
            id: "find_matches",
            intent: ChatIntent::FindMatches,
            condition: |ctx| ctx.mentions_any(FIND_MATCHES),
            message: |ctx, score| guidance::matches_reply(score, ctx.scoring)
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::AttachmentDescriptor;
    use crate::classifier::Classifier;
    use crate::config::ScoringConfig;
    use crate::types::MediaKind;

    fn classify(text: &str, files: &[AttachmentDescriptor], score: u8) -> (ChatIntent, u8) {
        let scoring = ScoringConfig::default();
        let ctx = ChatContext::new(text, files, score, 1, &scoring);
        let c = Classifier::new(default_rules()).classify(&ctx);
        (c.intent, c.score_after)
    }

    fn one_file() -> Vec<AttachmentDescriptor> {
        vec![AttachmentDescriptor::new("a.jpg", MediaKind::Image, 1000)]
    }

    #[test]
    fn rule_order_is_priority_order() {
        let ids = Classifier::new(default_rules()).rule_ids();
        assert_eq!(
            ids,
            vec!["attachments", "emergency", "plumbing", "development", "summary", "find_matches"]
        );
    }

    #[test]
    fn follow_up_branches_leave_score_unchanged() {
        assert_eq!(classify("URGENT help", &[], 30), (ChatIntent::Emergency, 30));
        assert_eq!(classify("my pipe is leaking", &[], 0), (ChatIntent::Plumbing, 0));
        assert_eq!(classify("build me a website", &[], 5), (ChatIntent::Development, 5));
        assert_eq!(classify("find provider please", &[], 40), (ChatIntent::FindMatches, 40));
    }

    #[test]
    fn summary_adds_fifteen() {
        assert_eq!(classify("can you summarize", &[], 20), (ChatIntent::Summary, 35));
        assert_eq!(classify("summary?", &[], 90), (ChatIntent::Summary, 100));
    }

    #[test]
    fn default_adds_ten() {
        assert_eq!(classify("ok here are more details", &[], 0), (ChatIntent::General, 10));
        assert_eq!(classify("thanks", &[], 95), (ChatIntent::General, 100));
    }

    #[test]
    fn urgent_beats_summarize() {
        assert_eq!(
            classify("urgent: please summarize", &[], 10),
            (ChatIntent::Emergency, 10)
        );
    }

    #[test]
    fn attachments_beat_any_text() {
        assert_eq!(
            classify("urgent leak, summarize", &one_file(), 0),
            (ChatIntent::Attachments, 25)
        );
        assert_eq!(classify("", &one_file(), 95), (ChatIntent::Attachments, 100));
    }

    #[test]
    fn substring_matching_quirks_are_kept() {
        // "happy" contains "app"
        assert_eq!(classify("I'm happy to wait", &[], 0), (ChatIntent::Development, 0));
        // "matches" contains "match" but "summary" comes first
        assert_eq!(classify("summary of matches", &[], 0), (ChatIntent::Summary, 15));
    }
}
