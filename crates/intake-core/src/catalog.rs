//! Provider, match, and conversation records shown by the browse and
//! messaging screens. Records are validated once, when they enter through
//! [`Catalog::from_yaml`]; everything downstream can trust them.

use crate::error::{IntakeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

const DEMO_CATALOG: &str = include_str!("../data/catalog.yaml");

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    /// 0.0 to 5.0.
    pub rating: f32,
    #[serde(default)]
    pub reviews: u32,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub location: String,
    /// `None` for remote providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f32>,
    /// Free-form price text such as "$80-120/hr".
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub verified: bool,
}

impl Provider {
    /// First dollar amount in the price text.
    pub fn price_floor(&self) -> Option<u32> {
        static PRICE: OnceLock<Regex> = OnceLock::new();
        let re = PRICE.get_or_init(|| Regex::new(r"\$\s*(\d+)").expect("valid price regex"));
        re.captures(&self.price)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    fn haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name, self.description, self.category, self.subcategory
        )
        .to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: String,
    pub name: String,
    /// 0 to 100.
    pub compatibility: u8,
    #[serde(default)]
    pub last_active: String,
    #[serde(default)]
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub provider: ProviderRef,
    /// Latest message from the provider; empty for a thread nobody has
    /// written in yet.
    #[serde(default)]
    pub last_message: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub unread: bool,
    pub request: RequestRef,
}

// ---------------------------------------------------------------------------
// BrowseSort / BrowseQuery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowseSort {
    /// Catalog order.
    #[default]
    Relevance,
    RatingHigh,
    PriceLow,
    PriceHigh,
    /// Nearest first; remote providers last.
    Distance,
}

impl BrowseSort {
    pub fn as_str(self) -> &'static str {
        match self {
            BrowseSort::Relevance => "relevance",
            BrowseSort::RatingHigh => "rating-high",
            BrowseSort::PriceLow => "price-low",
            BrowseSort::PriceHigh => "price-high",
            BrowseSort::Distance => "distance",
        }
    }
}

impl fmt::Display for BrowseSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BrowseSort {
    type Err = IntakeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(BrowseSort::Relevance),
            "rating-high" => Ok(BrowseSort::RatingHigh),
            "price-low" => Ok(BrowseSort::PriceLow),
            "price-high" => Ok(BrowseSort::PriceHigh),
            "distance" => Ok(BrowseSort::Distance),
            _ => Err(IntakeError::UnknownSort(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BrowseQuery {
    pub text: Option<String>,
    pub category: Option<String>,
    pub verified_only: bool,
    pub sort: BrowseSort,
}

/// Missing values sort after present ones in either direction.
fn cmp_missing_last<T>(
    a: Option<T>,
    b: Option<T>,
    descending: bool,
    cmp: fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = cmp(&a, &b);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub providers: Vec<Provider>,
    #[serde(default)]
    pub matches: Vec<MatchCandidate>,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

fn invalid(kind: &'static str, id: &str, reason: impl Into<String>) -> IntakeError {
    IntakeError::InvalidRecord {
        kind,
        id: id.to_string(),
        reason: reason.into(),
    }
}

impl Catalog {
    pub fn from_yaml(data: &str) -> Result<Self> {
        let catalog: Catalog = serde_yaml::from_str(data)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    /// The bundled sample data.
    pub fn demo() -> Result<Self> {
        Self::from_yaml(DEMO_CATALOG)
    }

    pub fn validate(&self) -> Result<()> {
        let mut provider_ids = HashSet::new();
        for p in &self.providers {
            if p.id.trim().is_empty() {
                return Err(invalid("provider", &p.name, "blank id"));
            }
            if p.name.trim().is_empty() {
                return Err(invalid("provider", &p.id, "blank name"));
            }
            if !p.rating.is_finite() || !(0.0..=5.0).contains(&p.rating) {
                return Err(invalid(
                    "provider",
                    &p.id,
                    format!("rating {} outside 0-5", p.rating),
                ));
            }
            if p.distance_miles.is_some_and(|d| !d.is_finite() || d < 0.0) {
                return Err(invalid(
                    "provider",
                    &p.id,
                    "distance must be a non-negative number",
                ));
            }
            if !provider_ids.insert(p.id.as_str()) {
                return Err(invalid("provider", &p.id, "duplicate id"));
            }
        }

        for m in &self.matches {
            if m.id.trim().is_empty() {
                return Err(invalid("match", &m.name, "blank id"));
            }
            if m.compatibility > 100 {
                return Err(invalid(
                    "match",
                    &m.id,
                    format!("compatibility {} above 100", m.compatibility),
                ));
            }
        }

        for c in &self.conversations {
            if c.id.trim().is_empty() {
                return Err(invalid("conversation", &c.provider.name, "blank id"));
            }
            if !provider_ids.contains(c.provider.id.as_str()) {
                return Err(invalid(
                    "conversation",
                    &c.id,
                    format!("unknown provider '{}'", c.provider.id),
                ));
            }
        }
        Ok(())
    }

    pub fn provider(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn browse(&self, query: &BrowseQuery) -> Vec<&Provider> {
        let text = query
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);

        let mut out: Vec<&Provider> = self
            .providers
            .iter()
            .filter(|p| !query.verified_only || p.verified)
            .filter(|p| {
                category
                    .as_deref()
                    .map_or(true, |c| p.category.to_lowercase() == c)
            })
            .filter(|p| text.as_deref().map_or(true, |t| p.haystack().contains(t)))
            .collect();

        // Stable sorts keep catalog order among ties.
        match query.sort {
            BrowseSort::Relevance => {}
            BrowseSort::RatingHigh => out.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            BrowseSort::PriceLow => out.sort_by(|a, b| {
                cmp_missing_last(a.price_floor(), b.price_floor(), false, Ord::cmp)
            }),
            BrowseSort::PriceHigh => out.sort_by(|a, b| {
                cmp_missing_last(a.price_floor(), b.price_floor(), true, Ord::cmp)
            }),
            BrowseSort::Distance => out.sort_by(|a, b| {
                cmp_missing_last(a.distance_miles, b.distance_miles, false, f32::total_cmp)
            }),
        }
        out
    }

    pub fn search_conversations(&self, text: &str) -> Vec<&Conversation> {
        let needle = text.trim().to_lowercase();
        self.conversations
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.provider.name.to_lowercase().contains(&needle)
                    || c.request.title.to_lowercase().contains(&needle)
                    || c.last_message.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn matches_by_compatibility(&self) -> Vec<&MatchCandidate> {
        let mut out: Vec<_> = self.matches.iter().collect();
        out.sort_by(|a, b| b.compatibility.cmp(&a.compatibility));
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
