//! Human-readable reply and summary text.
//!
//! Everything here is a pure function of its inputs; the classifier picks
//! which builder runs and the flows decide when the text is shown.

use crate::attachment::{describe_kinds, AttachmentDescriptor};
use crate::config::ScoringConfig;
use crate::profile::RequestProfile;
use crate::types::FieldName;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// MissingDetail
// ---------------------------------------------------------------------------

/// Detail categories suggested while a request is below the ready threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDetail {
    Timeline,
    Budget,
    Location,
    Qualifications,
}

impl MissingDetail {
    pub fn all() -> &'static [MissingDetail] {
        &[
            MissingDetail::Timeline,
            MissingDetail::Budget,
            MissingDetail::Location,
            MissingDetail::Qualifications,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            MissingDetail::Timeline => "Timeline and urgency",
            MissingDetail::Budget => "Budget constraints",
            MissingDetail::Location => "Location preferences",
            MissingDetail::Qualifications => "Specific qualifications needed",
        }
    }
}

/// Candidate provider types offered once the request is detailed enough.
const CANDIDATE_LINES: &[&str] = &[
    "Professional plumbers with emergency service availability",
    "Providers within 10 miles of your location",
    "Highly rated professionals (4.5+ stars)",
];

const UPLOAD_HINT: &str =
    "You can also upload images, documents, or other files to help clarify your requirements.";

fn bullets<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    lines
        .into_iter()
        .map(|l| format!("• {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn is_ready(score: u8, scoring: &ScoringConfig) -> bool {
    score >= scoring.ready_threshold
}

// ---------------------------------------------------------------------------
// Chat replies
// ---------------------------------------------------------------------------

pub fn welcome(name: &str) -> String {
    format!(
        "Hi {name}! I'm your AI assistant. I can help you create detailed service requests \
         and find the best matches. You can describe what you need or upload files like images, \
         documents, or audio to help me understand your requirements better. \
         How can I help you today?"
    )
}

/// Readiness guidance: "ready to proceed" at or above the threshold,
/// otherwise the list of detail categories to add.
pub fn readiness(score: u8, scoring: &ScoringConfig) -> String {
    if is_ready(score, scoring) {
        "Your requirements are quite detailed now. Would you like me to summarize what I \
         understand about your needs, or would you like to add more information?"
            .to_string()
    } else {
        format!(
            "To improve matching accuracy, consider providing more details about:\n{}",
            bullets(MissingDetail::all().iter().map(|d| d.label()))
        )
    }
}

pub fn attachments_reply(
    files: &[AttachmentDescriptor],
    text: &str,
    score: u8,
    scoring: &ScoringConfig,
) -> String {
    let noun = if files.len() == 1 { "file" } else { "files" };
    let kinds: Vec<&str> = describe_kinds(files).iter().map(|k| k.as_str()).collect();
    let echo = if text.trim().is_empty() {
        String::new()
    } else {
        format!(" Combined with your message: \"{}\"", text.trim())
    };
    format!(
        "I've analyzed the {} {noun} you uploaded ({}).{echo}\n\n\
         Based on this information, I've updated your requirement profile. \
         Your requirement completeness is now at {score}%.\n\n{}",
        files.len(),
        kinds.join(", "),
        readiness(score, scoring),
    )
}

pub fn emergency_reply() -> String {
    "I understand this is an urgent request. To help find the fastest service providers, \
     could you please specify:\n\n\
     1. Your exact location\n\
     2. The nature of the emergency\n\
     3. Any specific requirements\n\n\
     This will help us prioritize your request and find immediate assistance."
        .to_string()
}

pub fn plumbing_reply() -> String {
    format!(
        "It sounds like you need plumbing services. To better match you with qualified \
         plumbers, could you provide:\n\n{}\n\n\
         This will help us find the right professional for your needs.",
        bullets([
            "The specific issue (leak, clog, installation, etc.)",
            "How urgent this is",
            "Your location",
            "Any photos of the problem",
        ])
    )
}

pub fn development_reply() -> String {
    format!(
        "I see you're looking for development services. To help match you with the right \
         developers, could you share:\n\n{}\n\n\
         You can also upload any design mockups or requirement documents you have.",
        bullets([
            "The type of project (website, mobile app, etc.)",
            "Key features needed",
            "Your timeline",
            "Budget range",
        ])
    )
}

/// `previous` is the score before this turn's increment; the topic guess
/// is made from what was known before the summary was requested.
pub fn summary_reply(
    previous: u8,
    score: u8,
    signal_count: usize,
    scoring: &ScoringConfig,
) -> String {
    let topic = if previous > 50 {
        "technology development or support"
    } else {
        "assistance with a project or service"
    };
    let next = if is_ready(score, scoring) {
        "I have enough information to start matching you with service providers. \
         Would you like to proceed with finding matches?"
    } else {
        "I still need more information to make accurate matches. Could you provide more \
         details about your specific needs, timeline, and budget?"
    };
    let noun = if signal_count == 1 { "message" } else { "messages" };
    format!(
        "Based on our conversation ({signal_count} {noun} so far), here's a summary of your \
         requirements:\n\n\
         You're looking for professional services related to {topic}.\n\n\
         Your requirement completeness is at {score}%.\n\n{next}\n\n\
         You can also upload files like images or documents to help clarify your requirements."
    )
}

/// Number of candidate lines shown for `score`: proportional to the score,
/// at least one once the match threshold is met.
pub fn candidate_count(score: u8, scoring: &ScoringConfig) -> usize {
    if score < scoring.match_threshold {
        return 0;
    }
    let n = CANDIDATE_LINES.len();
    let scaled = (2 * n * usize::from(score) + 100) / 200;
    scaled.clamp(1, n)
}

pub fn matches_reply(score: u8, scoring: &ScoringConfig) -> String {
    let count = candidate_count(score, scoring);
    let body = if count == 0 {
        "I need more specific information to provide accurate matches. \
         Could you tell me more about your exact needs?"
            .to_string()
    } else {
        bullets(CANDIDATE_LINES.iter().take(count).copied())
    };
    format!(
        "I'll help you find service providers that match your requirements.\n\n\
         Based on the information you've provided ({score}% complete), here are the types of \
         providers that would be a good fit:\n\n{body}\n\n\
         Would you like to create a formal request to start receiving quotes from these providers?"
    )
}

pub fn general_reply(score: u8) -> String {
    format!(
        "Thanks for providing that information. I've updated your requirement profile, which \
         is now {score}% complete.\n\n\
         To help find the best matches for your needs, could you also tell me:\n\n{}\n\n{UPLOAD_HINT}",
        bullets([
            "What is your timeline for this service?",
            "Do you have a specific budget in mind?",
            "Are there any specific qualifications or certifications you require?",
        ])
    )
}

// ---------------------------------------------------------------------------
// Conversation threads
// ---------------------------------------------------------------------------

/// Canned answer from the other party in a buyer/provider thread.
pub fn counterpart_reply(request_title: &str) -> String {
    format!(
        "Thanks for the update on \"{request_title}\". That works for me. Is there any \
         additional information you need from me before we get started?"
    )
}

fn mentions_schedule(text: &str) -> bool {
    static SCHEDULE: OnceLock<Regex> = OnceLock::new();
    let re = SCHEDULE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(\d{1,2}\s?(am|pm)|today|tonight|tomorrow|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        )
        .expect("valid schedule regex")
    });
    re.is_match(text)
}

/// Suggested next message for the user, built from the other party's last
/// message.
pub fn reply_suggestion(last_message: &str, request_title: &str) -> String {
    let hint = if mentions_schedule(last_message) {
        "Confirm the time works for you and ask whether they need anything before they arrive."
            .to_string()
    } else if last_message.contains('?') {
        format!(
            "Answer their question directly and mention any photos or details that would \
             help with \"{request_title}\"."
        )
    } else {
        format!("Thank them and ask about availability and an estimated price for \"{request_title}\".")
    };
    format!("Suggestion: {hint}")
}

// ---------------------------------------------------------------------------
// Form summary
// ---------------------------------------------------------------------------

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

fn or_unspecified(value: &str) -> &str {
    if value.is_empty() {
        "unspecified"
    } else {
        value
    }
}

/// Summary shown on the review step of the request form.
pub fn form_summary(profile: &RequestProfile, scoring: &ScoringConfig) -> String {
    let description = profile.field(FieldName::Description);
    let mut preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    if description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        preview.push_str("...");
    }
    let files = profile.attachments.len();
    let noun = if files == 1 { "file" } else { "files" };

    let mut out = format!(
        "Based on your inputs, you're looking for {} services in {}.\n\n\
         Your request involves {}.\n\n\
         You've specified a budget of {} and a timeline of {}.\n\n\
         I've analyzed your attached files ({files} {noun}) and identified key requirements. \
         Your request completeness score is {}%.",
        or_unspecified(&profile.field(FieldName::Category).to_lowercase()),
        or_unspecified(profile.field(FieldName::Location)),
        or_unspecified(&preview),
        or_unspecified(profile.field(FieldName::Budget)),
        or_unspecified(profile.field(FieldName::Timeline)),
        profile.completeness,
    );
    if !is_ready(profile.completeness, scoring) {
        out.push_str(
            "\n\nTo improve matching accuracy, consider adding more details about specific \
             requirements and qualifications needed, and your timeline.",
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
