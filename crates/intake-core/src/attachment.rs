use crate::error::Result;
use crate::types::MediaKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata for a user-supplied file. File contents are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    pub name: String,
    pub media_kind: MediaKind,
    pub size_bytes: u64,
}

impl AttachmentDescriptor {
    pub fn new(name: impl Into<String>, media_kind: MediaKind, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            media_kind,
            size_bytes,
        }
    }

    /// Build a descriptor from a file on disk: size from metadata, kind from
    /// the extension's guessed MIME type.
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        Ok(Self {
            name,
            media_kind: MediaKind::from_mime(mime.essence_str()),
            size_bytes: meta.len(),
        })
    }

    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Unique media kinds in first-seen order.
pub fn describe_kinds(files: &[AttachmentDescriptor]) -> Vec<MediaKind> {
    let mut kinds = Vec::new();
    for f in files {
        if !kinds.contains(&f.media_kind) {
            kinds.push(f.media_kind);
        }
    }
    kinds
}
