//! Form-mode scoring: completeness is recomputed from scratch on every edit
//! as the share of filled slots (six fields plus "has an attachment").

use crate::attachment::AttachmentDescriptor;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::guidance;
use crate::profile::RequestProfile;
use crate::sink::ProfileSink;
use crate::types::FieldName;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormAnalysis {
    pub summary: String,
    pub completeness: u8,
    pub needs_improvement: bool,
}

pub struct FormFlow {
    profile: RequestProfile,
    config: EngineConfig,
}

impl FormFlow {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            profile: RequestProfile::new(),
            config,
        }
    }

    pub fn profile(&self) -> &RequestProfile {
        &self.profile
    }

    pub fn completeness(&self) -> u8 {
        self.profile.completeness
    }

    /// Set `field` to `value`. Unrecognized field names leave the profile
    /// untouched.
    pub fn apply_field_edit(&mut self, field: &str, value: impl Into<String>) -> &RequestProfile {
        match field.parse::<FieldName>() {
            Ok(name) => self.set_field(name, value),
            Err(_) => {
                tracing::debug!(field, "ignoring edit to unrecognized field");
                &self.profile
            }
        }
    }

    pub fn set_field(&mut self, name: FieldName, value: impl Into<String>) -> &RequestProfile {
        self.profile.fields.insert(name, value.into());
        self.recompute()
    }

    /// Append well-formed descriptors. Duplicates are kept as separate entries.
    pub fn attach_files(
        &mut self,
        files: impl IntoIterator<Item = AttachmentDescriptor>,
    ) -> &RequestProfile {
        for file in files {
            if file.is_well_formed() {
                self.profile.attachments.push(file);
            } else {
                tracing::debug!("ignoring malformed attachment");
            }
        }
        self.recompute()
    }

    /// Remove the attachment at `index`; out-of-range is a no-op.
    pub fn detach_file(&mut self, index: usize) -> Option<AttachmentDescriptor> {
        if index >= self.profile.attachments.len() {
            return None;
        }
        let removed = self.profile.attachments.remove(index);
        self.recompute();
        Some(removed)
    }

    pub fn analyze(&self) -> FormAnalysis {
        let completeness = self.profile.completeness;
        FormAnalysis {
            summary: guidance::form_summary(&self.profile, &self.config.scoring),
            completeness,
            needs_improvement: !guidance::is_ready(completeness, &self.config.scoring),
        }
    }

    pub fn start_new(&mut self) {
        self.profile = RequestProfile::new();
    }

    pub fn submit(&self, sink: &mut dyn ProfileSink) -> Result<()> {
        sink.accept(&self.profile)
    }

    fn recompute(&mut self) -> &RequestProfile {
        self.profile.completeness = self.profile.ratio_completeness();
        self.profile.touch();
        &self.profile
    }
}
