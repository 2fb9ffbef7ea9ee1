//! Presentation-ready entities
//!
//! Everything here is already normalized: ids are [`CanonicalId`]s, image
//! lists are flat string ids, source links are hydrated [`Source`]s, and
//! dates are parsed. Wire shapes live next to the fetchers that read them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers and enums
// =============================================================================

/// Single normalized identifier form (string-cast of the backend id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CanonicalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for CanonicalId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Editorial status of a backend record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Draft,
    Published,
    Archived,
    Other(String),
}

impl Status {
    pub fn parse(s: &str) -> Self {
        match s {
            "draft" => Self::Draft,
            "published" => Self::Published,
            "archived" => Self::Archived,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
            Self::Other(s) => s,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

/// Government level of a public office
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OfficeLevel {
    Local,
    Province,
    State,
    Other(String),
}

impl OfficeLevel {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "province" => Self::Province,
            "state" => Self::State,
            _ => Self::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Province => "province",
            Self::State => "state",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for OfficeLevel {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<OfficeLevel> for String {
    fn from(level: OfficeLevel) -> Self {
        level.as_str().to_string()
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A citation, hydrated from a junction link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: CanonicalId,
    pub name: Option<String>,
    pub url: Option<String>,
    pub slug: Option<String>,
    pub source_type: Option<String>,
    pub publisher: Option<String>,
    /// File id of an archived copy of the cited page
    pub file_snapshot: Option<String>,
    pub notes: Option<String>,
}

impl Source {
    /// Name, else URL, else id
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// Location of an office or activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Place {
    /// Free-text place value
    Text(String),
    /// Related place record
    Record {
        id: Option<CanonicalId>,
        name: Option<String>,
    },
}

impl Place {
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Record { name, .. } => name.as_deref(),
        }
    }
}

/// Taxonomy tag and navigable section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: CanonicalId,
    pub name: String,
    pub slug: String,
    pub status: Status,
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: CanonicalId,
    pub full_name: String,
    pub slug: String,
    /// Asset id or absolute URL
    pub image_ref: Option<String>,
    /// Rich text (HTML)
    pub biography: Option<String>,
    pub areas: Vec<Area>,
    pub sources: Vec<Source>,
    pub status: Status,
    pub sort_order: Option<i64>,
}

impl Profile {
    pub fn in_area(&self, area_slug: &str) -> bool {
        self.areas.iter().any(|a| a.slug == area_slug)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicOffice {
    pub id: CanonicalId,
    /// Owning profile
    pub profile_id: CanonicalId,
    pub title: String,
    pub body: Option<String>,
    pub description: Option<String>,
    pub institution: Option<String>,
    pub level: Option<OfficeLevel>,
    pub place: Option<Place>,
    pub province: Option<String>,
    pub appointed_or_elected: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// `None` means the office is still held
    pub end_date: Option<NaiveDate>,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub sources: Vec<Source>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: CanonicalId,
    pub title: String,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub place: Option<Place>,
    /// Profiles taking part
    pub persons: Vec<CanonicalId>,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub sources: Vec<Source>,
    pub status: Status,
    pub sort_order: Option<i64>,
}

/// Standalone editorial entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: CanonicalId,
    pub name: String,
    pub description: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub images: Vec<String>,
    pub sources: Vec<Source>,
    pub status: Status,
    pub sort_order: Option<i64>,
}

/// One row of a profile's merged career timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineEntry {
    Office(PublicOffice),
    Activity(Activity),
}

impl TimelineEntry {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Office(_) => "office",
            Self::Activity(_) => "activity",
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Office(o) => &o.title,
            Self::Activity(a) => &a.title,
        }
    }
}
