use crate::error::IntakeError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FieldName
// ---------------------------------------------------------------------------

/// The structured fields tracked by a request form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Title,
    Category,
    Description,
    Location,
    Budget,
    Timeline,
}

impl FieldName {
    pub fn all() -> &'static [FieldName] {
        &[
            FieldName::Title,
            FieldName::Category,
            FieldName::Description,
            FieldName::Location,
            FieldName::Budget,
            FieldName::Timeline,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::Category => "category",
            FieldName::Description => "description",
            FieldName::Location => "location",
            FieldName::Budget => "budget",
            FieldName::Timeline => "timeline",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldName {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(FieldName::Title),
            "category" => Ok(FieldName::Category),
            "description" => Ok(FieldName::Description),
            "location" => Ok(FieldName::Location),
            "budget" => Ok(FieldName::Budget),
            "timeline" => Ok(FieldName::Timeline),
            _ => Err(IntakeError::UnknownField(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// MediaKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Document,
    Other,
}

impl MediaKind {
    /// Classify by the top-level MIME type. `application/*` counts as a document.
    pub fn from_mime(mime: &str) -> MediaKind {
        let top = mime.split('/').next().unwrap_or_default();
        match top.trim().to_ascii_lowercase().as_str() {
            "image" => MediaKind::Image,
            "audio" => MediaKind::Audio,
            "video" => MediaKind::Video,
            "application" => MediaKind::Document,
            _ => MediaKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Other => "other",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaKind::Image),
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            "document" => Ok(MediaKind::Document),
            "other" => Ok(MediaKind::Other),
            _ => Err(IntakeError::UnknownMediaKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AccountType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Buyer,
    Provider,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Buyer => "buyer",
            AccountType::Provider => "provider",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(AccountType::Buyer),
            "provider" => Ok(AccountType::Provider),
            _ => Err(IntakeError::UnknownAccountType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ServiceCategory
// ---------------------------------------------------------------------------

/// Category choices offered by the request form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCategory {
    HomeRepair,
    Technology,
    Moving,
    Healthcare,
    Education,
    Legal,
    Design,
    Other,
}

impl ServiceCategory {
    pub fn all() -> &'static [ServiceCategory] {
        &[
            ServiceCategory::HomeRepair,
            ServiceCategory::Technology,
            ServiceCategory::Moving,
            ServiceCategory::Healthcare,
            ServiceCategory::Education,
            ServiceCategory::Legal,
            ServiceCategory::Design,
            ServiceCategory::Other,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceCategory::HomeRepair => "home-repair",
            ServiceCategory::Technology => "technology",
            ServiceCategory::Moving => "moving",
            ServiceCategory::Healthcare => "healthcare",
            ServiceCategory::Education => "education",
            ServiceCategory::Legal => "legal",
            ServiceCategory::Design => "design",
            ServiceCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServiceCategory::HomeRepair => "Home Repair",
            ServiceCategory::Technology => "Technology",
            ServiceCategory::Moving => "Moving Services",
            ServiceCategory::Healthcare => "Healthcare",
            ServiceCategory::Education => "Education",
            ServiceCategory::Legal => "Legal Services",
            ServiceCategory::Design => "Design",
            ServiceCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceCategory {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceCategory::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| IntakeError::UnknownCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
