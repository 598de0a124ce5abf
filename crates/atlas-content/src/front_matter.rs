//! Front-matter parsing.
//!
//! A content file starts with a YAML block delimited by `---` lines,
//! followed by the markdown body:
//!
//! ```text
//! ---
//! title: Introduction
//! description: What this is about
//! section: getting-started
//! next: quickstart
//! ---
//! # Introduction
//! ```
//!
//! Field names from the different content kinds are accepted as aliases
//! (`name` for `title`, `digest`/`excerpt` for `summary`, `pubDate` for
//! `date`). Unknown keys are ignored.

use std::path::Path;

use atlas_storage::EntityKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::entity::Entity;
use crate::error::ParseError;

/// Tags as either a YAML list or a comma separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tags {
    List(Vec<String>),
    Csv(String),
}

impl Tags {
    /// Trimmed, non-empty, deduplicated tags in declaration order.
    fn normalize(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            Self::List(list) => list,
            Self::Csv(csv) => csv.split(',').map(str::to_owned).collect(),
        };
        let mut tags: Vec<String> = Vec::with_capacity(raw.len());
        for tag in raw {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_owned());
            }
        }
        tags
    }
}

/// Author as a plain name or a `{ name: ... }` map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Author {
    Name(String),
    Detailed { name: String },
}

impl Author {
    fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Detailed { name } => name,
        }
    }
}

/// Raw front-matter fields as they appear in YAML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFrontMatter {
    #[serde(alias = "id")]
    slug: Option<String>,
    #[serde(alias = "name")]
    title: Option<String>,
    #[serde(alias = "digest", alias = "excerpt")]
    summary: Option<String>,
    description: Option<String>,
    tags: Option<Tags>,
    featured: bool,
    section: Option<String>,
    prev: Option<String>,
    next: Option<String>,
    icon: Option<String>,
    author: Option<Author>,
    #[serde(alias = "coverImage")]
    cover_image: Option<String>,
    category: Option<String>,
    #[serde(alias = "pubDate")]
    date: Option<String>,
}

/// Split raw file content into the YAML block and the body.
///
/// Returns `None` if the content does not open with a `---` line or the
/// block is never closed. A leading byte-order mark is ignored.
pub(crate) fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let first_end = raw.find('\n').map_or(raw.len(), |i| i + 1);
    if raw[..first_end].trim_end() != "---" {
        return None;
    }
    let rest = &raw[first_end..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a content file into an [`Entity`].
///
/// `name` is the file stem and becomes the slug unless the front-matter
/// declares one.
///
/// # Errors
///
/// Returns [`ParseError`] if the front-matter block is missing or malformed,
/// a required field is absent, or the date cannot be parsed.
pub fn parse_entity(
    kind: EntityKind,
    locale: &str,
    name: &str,
    source: &Path,
    raw: &str,
) -> Result<Entity, ParseError> {
    let (yaml, body) = split_front_matter(raw).ok_or(ParseError::MissingFrontMatter)?;
    let fm: RawFrontMatter = if yaml.trim().is_empty() {
        RawFrontMatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    let title = non_blank(fm.title).ok_or(ParseError::MissingField("title"))?;
    let (summary, description) = match (non_blank(fm.summary), non_blank(fm.description)) {
        (Some(summary), Some(description)) => (summary, description),
        (Some(summary), None) => (summary.clone(), summary),
        (None, Some(description)) => (description.clone(), description),
        (None, None) => return Err(ParseError::MissingField("description")),
    };

    let (section, prev, next) = if kind == EntityKind::Doc {
        let section = non_blank(fm.section).ok_or(ParseError::MissingField("section"))?;
        (Some(section), non_blank(fm.prev), non_blank(fm.next))
    } else {
        (None, None, None)
    };

    let publish_date = match non_blank(fm.date) {
        Some(value) => Some(parse_date(&value)?),
        None => None,
    };

    Ok(Entity {
        slug: non_blank(fm.slug).unwrap_or_else(|| name.to_owned()),
        kind,
        locale: locale.to_owned(),
        title,
        summary,
        description,
        tags: fm.tags.map(Tags::normalize).unwrap_or_default(),
        featured: fm.featured,
        section,
        prev,
        next,
        icon: non_blank(fm.icon),
        author: fm.author.map(Author::into_name).and_then(|a| non_blank(Some(a))),
        cover_image: non_blank(fm.cover_image),
        category: non_blank(fm.category),
        publish_date,
        body: body.to_owned(),
        source: source.to_path_buf(),
    })
}

/// Trim a string field, mapping blank values to `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Parse an RFC 3339 timestamp, a `YYYY-MM-DD HH:MM:SS` value or a bare date.
///
/// Values without an offset are taken as UTC.
fn parse_date(value: &str) -> Result<DateTime<Utc>, ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ParseError::InvalidDate(value.to_owned()))
}
