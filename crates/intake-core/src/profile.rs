use crate::attachment::AttachmentDescriptor;
use crate::types::FieldName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Round-half-up of `100 * filled / total`, clamped to 100. Zero slots scores 0.
pub fn ratio_score(filled: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let filled = filled.min(total);
    ((200 * filled + total) / (2 * total)) as u8
}

// ---------------------------------------------------------------------------
// RequestProfile
// ---------------------------------------------------------------------------

/// The accumulating record of one in-progress service request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestProfile {
    pub id: Uuid,
    #[serde(default)]
    pub fields: BTreeMap<FieldName, String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentDescriptor>,
    /// 0 to 100.
    #[serde(default)]
    pub completeness: u8,
    #[serde(default)]
    pub conversation_signals: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for RequestProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestProfile {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            fields: BTreeMap::new(),
            attachments: Vec::new(),
            completeness: 0,
            conversation_signals: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Field value, or `""` when unset.
    pub fn field(&self, name: FieldName) -> &str {
        self.fields.get(&name).map(String::as_str).unwrap_or("")
    }

    pub fn filled_field_count(&self) -> usize {
        FieldName::all()
            .iter()
            .filter(|f| !self.field(**f).is_empty())
            .count()
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Form-mode completeness: every recognized field plus one slot for
    /// "has at least one attachment".
    pub fn ratio_completeness(&self) -> u8 {
        let filled = self.filled_field_count() + usize::from(self.has_attachments());
        ratio_score(filled, FieldName::all().len() + 1)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaKind;

    #[test]
    fn ratio_score_rounds_half_up() {
        assert_eq!(ratio_score(0, 7), 0);
        assert_eq!(ratio_score(1, 7), 14);
        assert_eq!(ratio_score(2, 7), 29);
        assert_eq!(ratio_score(7, 7), 100);
        assert_eq!(ratio_score(1, 2), 50);
        assert_eq!(ratio_score(1, 8), 13);
        assert_eq!(ratio_score(3, 0), 0);
    }

    #[test]
    fn empty_profile_scores_zero() {
        let p = RequestProfile::new();
        assert_eq!(p.field(FieldName::Title), "");
        assert_eq!(p.filled_field_count(), 0);
        assert_eq!(p.ratio_completeness(), 0);
    }

    #[test]
    fn empty_string_fields_do_not_count() {
        let mut p = RequestProfile::new();
        p.fields.insert(FieldName::Title, String::new());
        p.fields.insert(FieldName::Budget, "$200".to_string());
        assert_eq!(p.filled_field_count(), 1);
    }

    #[test]
    fn full_profile_scores_hundred() {
        let mut p = RequestProfile::new();
        for &f in FieldName::all() {
            p.fields.insert(f, "x".to_string());
        }
        p.attachments
            .push(AttachmentDescriptor::new("a.jpg", MediaKind::Image, 10));
        assert_eq!(p.ratio_completeness(), 100);
    }

    #[test]
    fn yaml_roundtrip_keeps_field_keys() {
        let mut p = RequestProfile::new();
        p.fields.insert(FieldName::Location, "Brooklyn".to_string());
        let yaml = serde_yaml::to_string(&p).unwrap();
        assert!(yaml.contains("location: Brooklyn"));
        let parsed: RequestProfile = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.id, p.id);
        assert_eq!(parsed.field(FieldName::Location), "Brooklyn");
    }
}
