//! Normalized entity record.

use std::path::PathBuf;

use atlas_storage::EntityKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single markdown-backed content item: doc, blog post, client or server.
///
/// Entities are built once per resolution cycle and treated as immutable
/// afterwards. Field names are normalized across kinds: a server's `name`
/// and a doc's `title` both land in [`title`](Self::title), a server's
/// `digest` and a post's `excerpt` both land in [`summary`](Self::summary).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Unique within `(locale, kind)`. File stem unless front-matter overrides it.
    pub slug: String,
    /// Entity kind.
    pub kind: EntityKind,
    /// Locale code the entity was loaded for.
    pub locale: String,
    /// Display title.
    pub title: String,
    /// Short summary (digest, excerpt).
    pub summary: String,
    /// Longer description.
    pub description: String,
    /// Tags in declaration order, without duplicates.
    pub tags: Vec<String>,
    /// Featured flag.
    pub featured: bool,
    /// Navigational section (docs only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Slug of the previous document (docs only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Slug of the next document (docs only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Icon URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Author name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Blog category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Publication timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    /// Raw markdown body after the front-matter block.
    pub body: String,
    /// Path the entity was read from.
    #[serde(skip)]
    pub source: PathBuf,
}

impl Entity {
    /// Create an entity with the identifying fields set and everything else empty.
    ///
    /// Used by programmatic callers and tests; files go through
    /// [`parse_entity`](crate::parse_entity), which enforces required fields.
    #[must_use]
    pub fn new(
        kind: EntityKind,
        locale: impl Into<String>,
        slug: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            kind,
            locale: locale.into(),
            title: title.into(),
            summary: String::new(),
            description: String::new(),
            tags: Vec::new(),
            featured: false,
            section: None,
            prev: None,
            next: None,
            icon: None,
            author: None,
            cover_image: None,
            category: None,
            publish_date: None,
            body: String::new(),
            source: PathBuf::new(),
        }
    }

    /// Set summary and description.
    #[must_use]
    pub fn with_text(mut self, summary: impl Into<String>, description: impl Into<String>) -> Self {
        self.summary = summary.into();
        self.description = description.into();
        self
    }

    /// Set tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the featured flag.
    #[must_use]
    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    /// Set the doc section.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Set prev/next sibling references.
    #[must_use]
    pub fn with_siblings(mut self, prev: Option<&str>, next: Option<&str>) -> Self {
        self.prev = prev.map(str::to_owned);
        self.next = next.map(str::to_owned);
        self
    }

    /// Set the publication timestamp.
    #[must_use]
    pub fn with_publish_date(mut self, date: DateTime<Utc>) -> Self {
        self.publish_date = Some(date);
        self
    }

    /// Set the blog category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Exact, case-sensitive tag membership.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the two entities have at least one tag in common.
    #[must_use]
    pub fn shares_tag_with(&self, other: &Entity) -> bool {
        self.tags.iter().any(|t| other.has_tag(t))
    }
}
