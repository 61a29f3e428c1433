// Core data structures for the remix engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::normalize;

/// Target posting surface for a variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Twitter,
    Instagram,
}

impl Platform {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linkedin" => Some(Self::Linkedin),
            "twitter" => Some(Self::Twitter),
            "instagram" => Some(Self::Instagram),
            _ => None,
        }
    }

    /// Whether posts on this platform carry inline hashtags
    pub fn uses_inline_hashtags(&self) -> bool {
        matches!(self, Self::Twitter)
    }

    /// Whether this platform favors short-form posts (tight length band,
    /// smaller completion budget)
    pub fn is_short_form(&self) -> bool {
        matches!(self, Self::Twitter)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rhetorical framing used when generating a variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Angle {
    Narrative,
    Educational,
    Question,
    Practical,
    Story,
}

impl Angle {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Narrative => "narrative",
            Self::Educational => "educational",
            Self::Question => "question",
            Self::Practical => "practical",
            Self::Story => "story",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "narrative" => Some(Self::Narrative),
            "educational" => Some(Self::Educational),
            "question" => Some(Self::Question),
            "practical" => Some(Self::Practical),
            "story" => Some(Self::Story),
            _ => None,
        }
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a variation (and, derived, of a remix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Draft,
    Scheduled,
    Published,
}

impl PostStatus {
    /// Get string representation (matches the stored record values)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Scheduled => "SCHEDULED",
            Self::Published => "PUBLISHED",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One generated post candidate for a specific platform and angle
///
/// Invariants: `scheduled_for` is set iff `status == Scheduled`;
/// `published_at` is set exactly once when the variation reaches Published
/// and is never cleared afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: String,
    pub platform: Platform,
    pub angle: Angle,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    pub character_count: usize,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Variation {
    /// Create a draft variation from already-normalized content
    pub fn new(platform: Platform, angle: Angle, normalized_content: impl Into<String>) -> Self {
        let mut variation = Self {
            id: format!("var_{}", Uuid::new_v4().simple()),
            platform,
            angle,
            content: String::new(),
            hashtags: None,
            character_count: 0,
            status: PostStatus::Draft,
            scheduled_for: None,
            published_at: None,
        };
        variation.set_content(normalized_content.into());
        variation
    }

    /// Replace the content and recompute everything derived from it
    ///
    /// `normalized_content` must already have gone through
    /// [`normalize::normalize_post_content`]; hashtags are recomputed only
    /// for platforms that use them inline, and `character_count` always
    /// tracks the content length.
    pub fn set_content(&mut self, normalized_content: String) {
        self.hashtags = if self.platform.uses_inline_hashtags() {
            let tags = normalize::extract_hashtags(&normalized_content);
            if tags.is_empty() { None } else { Some(tags) }
        } else {
            None
        };
        self.character_count = normalized_content.chars().count();
        self.content = normalized_content;
    }

    /// Whether the variation has reached its terminal state
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Whether the scheduled time has elapsed at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Scheduled
            && self.scheduled_for.is_some_and(|at| at <= now)
    }
}

/// Current schema version written to new records
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Aggregate owning one source text and its generated variations
///
/// `status` is a cached projection of the variation collection; it is
/// recomputed via [`Remix::refresh_status`] after every mutation, never
/// assigned directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remix {
    pub id: String,
    pub owner_id: String,
    pub source_content: String,
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_variation_ids: Vec<String>,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl Remix {
    /// Create a new draft aggregate with its full variation set
    pub fn new(owner_id: impl Into<String>, source_content: impl Into<String>, variations: Vec<Variation>) -> Self {
        let mut remix = Self {
            id: format!("remix_{}", Uuid::new_v4().simple()),
            owner_id: owner_id.into(),
            source_content: source_content.into(),
            variations,
            status: PostStatus::Draft,
            created_at: Utc::now(),
            published_at: None,
            published_variation_ids: Vec::new(),
            schema_version: SCHEMA_VERSION,
        };
        remix.refresh_status();
        remix
    }

    /// Recompute the derived aggregate status from the variation collection
    pub fn refresh_status(&mut self) {
        self.status = resolve_status(&self.variations);
    }

    /// Locate a variation by id
    pub fn find_variation(&self, variation_id: &str) -> Option<&Variation> {
        self.variations.iter().find(|v| v.id == variation_id)
    }

    /// Locate a variation by id, mutably
    pub fn find_variation_mut(&mut self, variation_id: &str) -> Option<&mut Variation> {
        self.variations.iter_mut().find(|v| v.id == variation_id)
    }

    /// Record a successful publish of one variation
    ///
    /// Appends to the audit set at most once per variation id and moves the
    /// aggregate-level `published_at` to the most recent publish time.
    pub fn record_publish(&mut self, variation_id: &str, published_at: DateTime<Utc>) {
        if !self.published_variation_ids.iter().any(|id| id == variation_id) {
            self.published_variation_ids.push(variation_id.to_string());
        }
        self.published_at = Some(published_at);
    }

    /// Default missing fields on records read from the store
    ///
    /// Older records may predate `published_variation_ids` or the schema
    /// tag; serde defaults cover absence, and the cached status projection
    /// is recomputed so it can never drift from the variations on disk.
    pub fn migrate(mut self) -> Self {
        if self.schema_version < SCHEMA_VERSION {
            self.schema_version = SCHEMA_VERSION;
        }
        self.refresh_status();
        self
    }
}

/// Derive the aggregate status from a variation collection
///
/// Published if any variation is published; else Scheduled if any is
/// scheduled; else Draft. Pure function of its input.
pub fn resolve_status(variations: &[Variation]) -> PostStatus {
    if variations.iter().any(|v| v.status == PostStatus::Published) {
        PostStatus::Published
    } else if variations.iter().any(|v| v.status == PostStatus::Scheduled) {
        PostStatus::Scheduled
    } else {
        PostStatus::Draft
    }
}
